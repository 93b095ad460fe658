//! Pipeline configuration and validation.

use std::error::Error;
use std::fmt;

use mimic_demo::{LoadOptions, DEMO_EXTENSION};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`DemoConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `sequence_length` is zero.
    ZeroSequenceLength,
    /// `extension` is the empty string.
    EmptyExtension,
    /// `extension` contains a dot.
    ExtensionHasDot {
        /// The configured extension.
        extension: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSequenceLength => write!(f, "sequence_length must be at least 1"),
            Self::EmptyExtension => write!(f, "extension must not be empty"),
            Self::ExtensionHasDot { extension } => {
                write!(f, "extension {extension:?} must be given without a dot")
            }
        }
    }
}

impl Error for ConfigError {}

// ── DemoConfig ─────────────────────────────────────────────────────

/// Settings for [`demo_to_buffer`](crate::demo_to_buffer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    /// Maximum transitions per training sequence. Default: 1.
    pub sequence_length: usize,
    /// Demonstration file extension, without the dot. Default: `"demo"`.
    pub extension: String,
    /// Reject directories whose files disagree on observation or action
    /// shapes. Default: `true`.
    pub check_parameters: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sequence_length: 1,
            extension: DEMO_EXTENSION.to_string(),
            check_parameters: true,
        }
    }
}

impl DemoConfig {
    /// Validate all fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence_length == 0 {
            return Err(ConfigError::ZeroSequenceLength);
        }
        if self.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        if self.extension.contains('.') {
            return Err(ConfigError::ExtensionHasDot {
                extension: self.extension.clone(),
            });
        }
        Ok(())
    }

    /// The loader options these settings imply.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            extension: self.extension.clone(),
            check_parameters: self.check_parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(DemoConfig::default().validate().is_ok());
        assert_eq!(DemoConfig::default().load_options(), LoadOptions::default());
    }

    #[test]
    fn zero_sequence_length_fails() {
        let cfg = DemoConfig {
            sequence_length: 0,
            ..DemoConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroSequenceLength));
    }

    #[test]
    fn bad_extensions_fail() {
        let mut cfg = DemoConfig {
            extension: String::new(),
            ..DemoConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyExtension));

        cfg.extension = ".demo".into();
        match cfg.validate() {
            Err(ConfigError::ExtensionHasDot { extension }) => assert_eq!(extension, ".demo"),
            other => panic!("expected ExtensionHasDot, got {other:?}"),
        }
    }

    #[test]
    fn load_options_carry_settings() {
        let cfg = DemoConfig {
            sequence_length: 16,
            extension: "rec".into(),
            check_parameters: false,
        };
        let opts = cfg.load_options();
        assert_eq!(opts.extension, "rec");
        assert!(!opts.check_parameters);
    }
}
