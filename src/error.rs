//! Configuration errors
//!
//! The field size is the one validated external input. Everything else in
//! the core is a state machine whose violations are programming faults.

use std::fmt;

/// Field axis named in an error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    FieldTooLarge { axis: Axis, value: i32, max: i32 },
    FieldEmpty { axis: Axis, value: i32 },
    InvalidTickInterval { value: u64 },
    Io { path: String, message: String },
    Parse { path: String, message: String },
}

impl ConfigError {
    /// True when retrying with the default field can succeed
    pub fn is_field_error(&self) -> bool {
        matches!(self, Self::FieldTooLarge { .. } | Self::FieldEmpty { .. })
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldTooLarge { axis, value, max } => {
                write!(f, "field {axis} {value} exceeds the supported maximum of {max}")
            }
            Self::FieldEmpty { axis, value } => {
                write!(f, "field {axis} must be positive, got {value}")
            }
            Self::InvalidTickInterval { value } => {
                write!(f, "tick interval must be at least 1 ms, got {value}")
            }
            Self::Io { path, message } => write!(f, "failed to read {path}: {message}"),
            Self::Parse { path, message } => write!(f, "invalid settings in {path}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}
