//! Mimic: recorded agent demonstrations as training data for imitation learning.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Mimic sub-crates and wires them into a single call, [`demo_to_buffer`].
//!
//! # Quick start
//!
//! ```rust
//! use mimic::prelude::*;
//!
//! let params = ParameterRecord {
//!     brain_name: "pyramids".into(),
//!     vector_observation_size: 4,
//!     num_stacked_vector_observations: 1,
//!     vector_action_size: [5].into_iter().collect(),
//!     vector_action_space_type: ActionSpaceType::Discrete,
//!     camera_resolutions: vec![],
//! };
//! let steps: Vec<StepRecord> = (0..10)
//!     .map(|i| StepRecord {
//!         vector_observation: vec![i as f32; 4],
//!         previous_action: vec![1.0],
//!         reward: 0.1,
//!         done: i == 6,
//!         ..StepRecord::default()
//!     })
//!     .collect();
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("expert.demo");
//! std::fs::write(&path, encode_demonstration("expert", &params, &steps).unwrap()).unwrap();
//!
//! let config = DemoConfig { sequence_length: 4, ..DemoConfig::default() };
//! let (loaded, buffer) = demo_to_buffer(&path, &config).unwrap();
//! assert_eq!(loaded, params);
//! assert_eq!(buffer.len(), 9);
//! assert_eq!(buffer.episode_count(), 2);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mimic-core` | Record types and the decoder trait |
//! | [`demo`] | `mimic-demo` | Framing, scanning, loading, and writing `.demo` files |
//! | [`buffer`] | `mimic-buffer` | Transitions, episodes, and sequence-chunked buffers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;

use std::path::Path;

use mimic_buffer::TrainingBuffer;
use mimic_core::ParameterRecord;
use mimic_demo::{BinaryCodec, DemoLoader};
use tracing::{info, instrument};

pub use config::{ConfigError, DemoConfig};
pub use error::MimicError;

/// Record types and the decoder seam (`mimic-core`).
///
/// Implement [`types::RecordDecoder`] to read a record encoding other than
/// the shipped [`demo::BinaryCodec`].
pub use mimic_core as types;

/// Demonstration files (`mimic-demo`).
///
/// [`demo::DemoLoader`] reads a file or a directory of files,
/// [`demo::DemoWriter`] records new ones.
pub use mimic_demo as demo;

/// Training buffer assembly (`mimic-buffer`).
///
/// [`buffer::build`] turns step records into a [`buffer::TrainingBuffer`].
pub use mimic_buffer as buffer;

/// Common imports for typical Mimic usage.
///
/// ```rust
/// use mimic::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use mimic_core::{
        ActionSpaceType, CameraResolution, MetaRecord, ParameterRecord, RecordDecoder, StepRecord,
    };

    // Files
    pub use mimic_demo::{
        encode_demonstration, load_demonstration, BinaryCodec, DemoError, DemoLoader, DemoWriter,
        Demonstration, LoadOptions,
    };

    // Buffers
    pub use mimic_buffer::{build, BufferError, BufferKey, Column, TrainingBuffer};

    // Pipeline
    pub use crate::{demo_to_buffer, ConfigError, DemoConfig, MimicError};
}

/// Load every demonstration under `path` and build a training buffer.
///
/// `path` may be a single file or a directory of files with the configured
/// extension. Returns the first file's parameter record alongside the
/// buffer.
pub fn demo_to_buffer(
    path: impl AsRef<Path>,
    config: &DemoConfig,
) -> Result<(ParameterRecord, TrainingBuffer), MimicError> {
    load_and_build(path.as_ref(), config)
}

#[instrument(skip(path, config), fields(path = %path.display(), sequence_length = config.sequence_length))]
fn load_and_build(
    path: &Path,
    config: &DemoConfig,
) -> Result<(ParameterRecord, TrainingBuffer), MimicError> {
    config.validate()?;
    let loader = DemoLoader::new(BinaryCodec, config.load_options());
    let demonstration = loader.load(path)?;
    let buffer = mimic_buffer::build(
        &demonstration.steps,
        &demonstration.parameters,
        config.sequence_length,
    )?;
    info!(
        files = demonstration.files.len(),
        transitions = buffer.len(),
        sequences = buffer.sequences().len(),
        "built buffer from demonstrations"
    );
    Ok((demonstration.parameters, buffer))
}
