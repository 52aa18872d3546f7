pub mod error;
pub mod types;

pub use error::ResolveError;
pub use types::*;
