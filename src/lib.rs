pub mod config;
pub mod convert;
pub mod engine;
pub mod logging;
pub mod prompt;
