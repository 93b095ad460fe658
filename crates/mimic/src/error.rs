//! Umbrella error for the demonstration-to-buffer pipeline.

use std::error::Error;
use std::fmt;

use mimic_buffer::BufferError;
use mimic_demo::DemoError;

use crate::config::ConfigError;

/// Any failure of [`demo_to_buffer`](crate::demo_to_buffer).
#[derive(Debug)]
pub enum MimicError {
    /// The configuration was rejected before any file was read.
    Config(ConfigError),
    /// Locating, reading, or scanning a demonstration failed.
    Demo(DemoError),
    /// The loaded steps could not be assembled into a buffer.
    Buffer(BufferError),
}

impl fmt::Display for MimicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Demo(e) => write!(f, "demonstration: {e}"),
            Self::Buffer(e) => write!(f, "buffer: {e}"),
        }
    }
}

impl Error for MimicError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Demo(e) => Some(e),
            Self::Buffer(e) => Some(e),
        }
    }
}

impl From<ConfigError> for MimicError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<DemoError> for MimicError {
    fn from(e: DemoError) -> Self {
        Self::Demo(e)
    }
}

impl From<BufferError> for MimicError {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}
