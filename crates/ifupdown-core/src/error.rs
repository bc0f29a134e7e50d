//! Error types for interface parsing and validation

use std::net::IpAddr;

use thiserror::Error;

use crate::types::AddressVersion;

/// Main error type for interface operations
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Structural errors raised while reading interfaces text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid interface data provided at line {line}: {message}")]
    InvalidIfaceData { line: usize, message: String },

    #[error("multiple interfaces in data provided ({count} iface stanzas)")]
    MultipleInterfaces { count: usize },

    #[error("Duplicate interface: {name}")]
    DuplicateInterface { name: String },

    #[error("interface block '{name}': {source}")]
    Block {
        name: String,
        source: Box<ConfigError>,
    },

    #[error("{} interface blocks failed: {}", .errors.len(), join(.errors, "; "))]
    Multiple { errors: Vec<ConfigError> },
}

impl ConfigError {
    /// Invalid-data error for a directive at `line`
    pub fn invalid_data(line: usize, message: impl Into<String>) -> Self {
        ConfigError::InvalidIfaceData {
            line,
            message: message.into(),
        }
    }

    /// Flattened list of the leaf errors, unwrapping block and aggregate wrappers
    pub fn leaves(&self) -> Vec<&ConfigError> {
        match self {
            ConfigError::Block { source, .. } => source.leaves(),
            ConfigError::Multiple { errors } => errors.iter().flat_map(|e| e.leaves()).collect(),
            other => vec![other],
        }
    }
}

/// Semantic errors reported by [`NetworkInterface::validate`](crate::NetworkInterface::validate)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("interface has errors: {}", join(.errors, ", "))]
    InterfaceHasErrors {
        name: String,
        errors: Vec<ValidationError>,
    },

    #[error("unallocated interface")]
    UnallocatedInterface,

    #[error("address config not set")]
    ConfigNotSet,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid mask: {0}")]
    InvalidMask(String),

    #[error("invalid broadcast: {0}")]
    InvalidBroadcast(String),

    #[error("invalid gateway: {0}")]
    InvalidGateway(String),

    #[error("invalid dns server: {0}")]
    InvalidDnsServer(String),

    #[error("invalid mac address: {0}")]
    InvalidMacAddress(String),

    #[error("[{name}] invalid address version: {version:?}")]
    InvalidAddressVersion {
        name: String,
        version: AddressVersion,
    },

    #[error("address set when DHCP enabled")]
    AddressSetWhenDhcp,

    #[error("address not set with static config")]
    AddressNotSetStatic,

    #[error("mask not set with static config")]
    MaskNotSetStatic,

    /// Spelling matches the published error name.
    #[error("address must be loopback when config is loopback: {0}")]
    AdressNotLoopback(IpAddr),
}

impl ValidationError {
    /// Specific errors carried by this error
    ///
    /// For the umbrella variant this is the wrapped list, for any other
    /// variant it is the error itself.
    pub fn causes(&self) -> &[ValidationError] {
        match self {
            ValidationError::InterfaceHasErrors { errors, .. } => errors,
            other => std::slice::from_ref(other),
        }
    }

    /// Whether any cause satisfies `pred`
    pub fn any(&self, pred: impl Fn(&ValidationError) -> bool) -> bool {
        self.causes().iter().any(pred)
    }
}

fn join<E: std::fmt::Display>(errors: &[E], sep: &str) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}
