//! Error types for the controller daemon.

use ofctl_switch::SwitchError;
use std::path::PathBuf;
use thiserror::Error;

/// Controller errors.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// A request could not be delivered to the switch.
    #[error("Switch error: {0}")]
    Switch(#[from] SwitchError),

    /// A configuration value is out of range or inconsistent.
    #[error("Configuration error: {field}: {message}")]
    Config { field: &'static str, message: String },

    /// The configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this daemon.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A frame is too short to carry an Ethernet header.
    #[error("Malformed frame ({len} bytes): {reason}")]
    MalformedFrame { len: usize, reason: String },

    /// A line of the replay stream is not a valid event envelope.
    #[error("Invalid event on line {line}: {message}")]
    Replay { line: usize, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ControllerError {
    pub fn config(field: &'static str, message: impl Into<String>) -> Self {
        ControllerError::Config {
            field,
            message: message.into(),
        }
    }

    pub fn malformed_frame(len: usize, reason: impl Into<String>) -> Self {
        ControllerError::MalformedFrame {
            len,
            reason: reason.into(),
        }
    }
}

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;
