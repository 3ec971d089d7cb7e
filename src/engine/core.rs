mod error;
mod ffmpeg_cmd;
mod ffmpeg_info;
mod output_path;
mod pipeline;
mod selector;
mod types;

pub use error::{ConvertError, ConvertResult};
pub use ffmpeg_cmd::{
    Executor, FfmpegInvocation, ProcessExecutor, RunOutcome, build_ffmpeg_cmd, format_ffmpeg_cmd,
    run_ffmpeg,
};
pub use ffmpeg_info::{ffmpeg_version, ffprobe_version};
pub use output_path::resolve_output_path;
pub use pipeline::{Conversion, ConversionPlan, Converter};
pub use selector::{cuvid_decoder_for, select_codecs};
pub use types::{
    CodecPlan, ConversionRequest, OutputKind, QualityPreset, ResolvedOutputPath,
    ensure_regular_file,
};
