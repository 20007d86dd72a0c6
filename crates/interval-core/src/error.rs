//! Core error types for interval-core.
//!
//! Timer operations themselves never fail: out-of-range input is clamped and
//! calls made in the wrong state are ignored. The errors here cover the
//! ambient surfaces around the engine (config file, service handle, audio).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for interval-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The timer service task has shut down and can no longer take commands.
    #[error("Timer service is no longer running")]
    ServiceStopped,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Audio cue playback errors. These are logged by the service and never
/// interrupt a transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CueError {
    /// No output device, or the device refused to open.
    #[error("Audio output unavailable")]
    Unavailable,

    /// The device accepted the request but playback failed.
    #[error("Audio playback failed: {0}")]
    Playback(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
