use thiserror::Error;

/// Main error type for the motion-fx library
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Recording error: {0}")]
    Recording(#[from] RecordingError),

    #[error("Effect error: {0}")]
    Effect(#[from] EffectError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Capture-source errors
///
/// Only `OpenFailed` is fatal; everything seen mid-loop is transient and
/// handled by skipping the iteration.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open capture device {index}: {reason}")]
    OpenFailed { index: u32, reason: String },

    #[error("Failed to read frame: {reason}")]
    FrameFailed { reason: String },
}

/// Recording-sink errors
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Failed to open recording sink at {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("Failed to write frame to sink: {reason}")]
    WriteFailed { reason: String },

    #[error("Recording sink is already closed")]
    Closed,
}

/// Per-effect errors, caught at the effect boundary by the pipeline
#[derive(Error, Debug)]
pub enum EffectError {
    #[error("Effect application failed: {effect} - {reason}")]
    Failed { effect: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Unknown parameter '{name}' for effect {effect}")]
    UnknownParameter { effect: String, name: String },
}

/// Convenience type alias for Results using FxError
pub type Result<T> = std::result::Result<T, FxError>;

impl FxError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (the frame loop keeps running)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A single dropped frame never stops the loop
            Self::Capture(CaptureError::FrameFailed { .. }) => true,
            // Recording failures degrade to "loop continues unrecorded"
            Self::Recording(_) => true,
            // Effect failures degrade to the pre-effect frame
            Self::Effect(_) => true,
            Self::Io(_) => true,
            _ => false,
        }
    }
}
