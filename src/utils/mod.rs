pub mod cancel;
pub mod config;
pub mod constants;
pub mod env;
pub mod input;
pub mod progress;
