// Conversion engine - independent of the CLI

pub mod core;
pub mod hardware;
pub mod metadata;
pub mod probe;
pub mod system;

pub use core::*;
pub use hardware::{FfmpegListing, HardwareCapabilities, HwTag, ListingSource, probe_capabilities};
pub use probe::{FfprobeProber, MediaInfo, MediaProber};
