//! Numbered terminal menus for the output format and quality preset.
//!
//! Both menus read whole lines from any `BufRead`, so tests drive them with
//! byte slices.

use crate::engine::{ConvertError, ConvertResult, OutputKind, QualityPreset};
use std::io::{BufRead, Write};

/// Ask for the output format until a valid 1-4 choice is entered.
/// EOF on the reader is `InvalidSelection`.
pub fn prompt_output_kind<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> ConvertResult<OutputKind> {
    loop {
        writeln!(out, "Select output format:")?;
        for (i, kind) in OutputKind::ALL.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, kind.display_name())?;
        }
        write!(out, "Choice [1-{}]: ", OutputKind::ALL.len())?;
        out.flush()?;

        let line = read_choice(input)?;
        let kind = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(OutputKind::from_menu_index);

        match kind {
            Some(kind) => return Ok(kind),
            None => writeln!(out, "Invalid choice '{}', try again.", line.trim())?,
        }
    }
}

/// Ask for the NVENC preset once; anything unrecognized is balanced
pub fn prompt_quality_preset<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> ConvertResult<QualityPreset> {
    writeln!(out, "Select encoding quality:")?;
    for (i, preset) in QualityPreset::ALL.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, preset.display_name())?;
    }
    write!(out, "Choice [1-{}, default 2]: ", QualityPreset::ALL.len())?;
    out.flush()?;

    let preset = QualityPreset::from_menu_choice(&read_choice(input)?);
    tracing::debug!("Quality preset: {}", preset);
    Ok(preset)
}

fn read_choice<R: BufRead>(input: &mut R) -> ConvertResult<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ConvertError::InvalidSelection(
            "no selection made (end of input)".to_string(),
        ));
    }
    Ok(line)
}
