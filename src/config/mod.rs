pub mod env;
mod loader;

pub use env::{AppConfig, ConfigError, DirectoryConfig, ProcessingConfig};
pub use loader::load_config;
