//! ifupdown interfaces core
//!
//! Typed interface records, their builder operations, validation and
//! rendering to interfaces(5) text.

pub mod error;
pub mod interface;
pub mod render;
pub mod types;
pub mod validate;

pub use error::{ConfigError, NetworkError, ValidationError};
pub use interface::NetworkInterface;
pub use types::*;

/// Result type for interface operations
pub type Result<T> = std::result::Result<T, NetworkError>;
