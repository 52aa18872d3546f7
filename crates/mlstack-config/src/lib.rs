mod raw;
mod loader;
pub mod error;

pub use loader::{load_inputs, load_runtime, parse_inputs, parse_runtime};
pub use error::ConfigError;
