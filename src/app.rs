use crate::cli::{Cli, Commands, ConvertArgs};
use anyhow::{Context, Result, bail};
use ffconvert::config::{Config, warn_default_not_saved};
use ffconvert::convert::{ConvertOptions, ConvertSession, run_convert};
use ffconvert::engine::metadata::{collect_metadata, write_metadata};
use ffconvert::engine::system::{HostSystemInfo, SystemInfoProvider};
use ffconvert::engine::{
    self, ConvertError, Converter, FfmpegListing, FfprobeProber, ProcessExecutor, RunOutcome,
};
use ffconvert::logging;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// Dispatch the parsed command line and return the process exit code
pub fn run(cli: Cli) -> i32 {
    // init-config must work even when the existing file does not parse
    if let Some(Commands::InitConfig) = cli.command {
        logging::init(cli.verbose, "warn");
        return handle_init_config();
    }

    let (config, save_error) = match Config::load_or_create() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };
    // The subscriber depends on the config, so report the write failure after it is installed
    logging::init(cli.verbose, &config.defaults.log_level);
    if let Some(e) = save_error {
        warn_default_not_saved(&e);
    }

    let result = match cli.command {
        Some(Commands::Info) => handle_info(&config),
        Some(Commands::Probe { file }) => handle_probe(&config, &file),
        Some(Commands::Metadata { file, output }) => {
            handle_metadata(&config, &file, output.as_deref())
        }
        Some(Commands::CheckFfmpeg) => handle_check_ffmpeg(&config),
        Some(Commands::InitConfig) => Ok(handle_init_config()),
        None => handle_convert(&config, &cli.convert),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<ConvertError>()
                .map(ConvertError::exit_code)
                .unwrap_or(1)
        }
    }
}

fn converter(config: &Config) -> Converter<FfmpegListing, FfprobeProber, ProcessExecutor> {
    Converter::new(
        &config.tools.ffmpeg,
        FfmpegListing::new(&config.tools.ffmpeg),
        FfprobeProber::new(&config.tools.ffprobe),
        ProcessExecutor,
    )
}

fn handle_convert(config: &Config, args: &ConvertArgs) -> Result<i32> {
    let Some(input) = args.input.clone() else {
        bail!("No input file given. Run 'ffconvert --help' for usage.");
    };

    let options = ConvertOptions {
        input,
        format: args.format().map(str::to_string),
        preset: args.preset.clone(),
        destination: args.destination(),
        overwrite: args.overwrite,
        dry_run: args.dry_run,
        interactive: !args.no_prompt && io::stdin().is_terminal(),
    };

    let session = run_convert(
        &converter(config),
        &options,
        &config.defaults,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?;

    match &session {
        ConvertSession::Planned(plan) => {
            println!("{}", engine::format_ffmpeg_cmd(&plan.invocation));
        }
        ConvertSession::Finished(conversion) => match &conversion.outcome {
            RunOutcome::Succeeded { output } => {
                println!("Conversion complete: {}", output.display());
            }
            RunOutcome::NonZeroExit { code, output } => {
                let status = code
                    .map(|c| format!("exit code {}", c))
                    .unwrap_or_else(|| "a signal".to_string());
                eprintln!(
                    "Warning: ffmpeg finished with {}; {} may be incomplete. \
                     Check ffmpeg's output above.",
                    status,
                    output.display()
                );
            }
        },
    }
    Ok(session.exit_code())
}

fn handle_info(config: &Config) -> Result<i32> {
    let capabilities = converter(config).capabilities()?;

    println!("Hardware acceleration ({}):", config.tools.ffmpeg.display());
    if capabilities.is_empty() {
        println!("  none detected, software encoding will be used");
    }
    for tag in capabilities.iter() {
        println!("  {:<12} {}", tag.to_string(), tag.display_name());
    }

    let system = HostSystemInfo.snapshot();
    println!();
    println!("CPU:    {} ({})", system.cpu.name, system.cpu.vendor);
    println!(
        "        {} cores / {} threads",
        system.cpu.cores, system.cpu.threads
    );
    println!("Memory: {} (speed: {})", system.memory.total, system.memory.speed);
    println!(
        "GPU:    {} (memory: {})",
        system.gpu.name, system.gpu.dedicated_memory
    );
    Ok(0)
}

fn handle_probe(config: &Config, file: &Path) -> Result<i32> {
    use ffconvert::engine::MediaProber;

    engine::ensure_regular_file(file)?;
    let info = FfprobeProber::new(&config.tools.ffprobe).probe(file)?;

    println!("File:     {}", file.display());
    if let Some(format) = &info.format_name {
        println!("Format:   {}", format);
    }
    if let Some(duration) = info.duration {
        println!("Duration: {:.2} seconds", duration);
    }
    if let Some(bit_rate) = info.bit_rate {
        println!("Bitrate:  {} kb/s", bit_rate / 1000);
    }
    for stream in &info.streams {
        let kind = stream.codec_type.as_deref().unwrap_or("unknown");
        let codec = stream.codec_name.as_deref().unwrap_or("unknown");
        match (stream.width, stream.height) {
            (Some(w), Some(h)) => println!("  #{} {}: {} {}x{}", stream.index, kind, codec, w, h),
            _ => println!("  #{} {}: {}", stream.index, kind, codec),
        }
    }
    Ok(0)
}

fn handle_metadata(config: &Config, file: &Path, output: Option<&Path>) -> Result<i32> {
    let capabilities = converter(config).capabilities()?;
    let report = collect_metadata(
        file,
        &FfprobeProber::new(&config.tools.ffprobe),
        &HostSystemInfo,
        capabilities,
    )?;
    let written: PathBuf = write_metadata(&report, output)
        .with_context(|| format!("Failed to write metadata for {}", file.display()))?;
    println!("Metadata written to {}", written.display());
    Ok(0)
}

fn handle_check_ffmpeg(config: &Config) -> Result<i32> {
    let version = engine::ffmpeg_version(&config.tools.ffmpeg)?;
    println!("ffmpeg found: {}", version);
    let probe_version = engine::ffprobe_version(&config.tools.ffprobe)?;
    println!("ffprobe found: {}", probe_version);
    Ok(0)
}

fn handle_init_config() -> i32 {
    match Config::load() {
        Ok(cfg) => {
            match Config::config_path() {
                Ok(path) => println!("Config loaded successfully from {}", path.display()),
                Err(e) => println!("Config loaded, but config path unknown: {:#}", e),
            }
            println!("{:#?}", cfg);
            0
        }
        Err(e) => {
            println!("Config missing or invalid: {:#}", e);
            println!("Creating default config...");

            if let Err(err) = Config::default().save() {
                eprintln!("Failed to save default config: {:#}", err);
                return 1;
            }
            match Config::config_path() {
                Ok(path) => println!("Default config saved to {}", path.display()),
                Err(e) => println!("Default config saved (path unknown): {:#}", e),
            }
            0
        }
    }
}
