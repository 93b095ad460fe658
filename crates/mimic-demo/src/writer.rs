//! Demonstration recording writer.
//!
//! [`DemoWriter`] streams records to any `Write + Seek` sink in the on-disk
//! layout that [`scan`](crate::scanner::scan) reads. The meta region is
//! reserved up front and filled in by [`finish`](DemoWriter::finish), once
//! the step and episode counts are known.

use std::io::{Cursor, Seek, SeekFrom, Write};

use mimic_core::{MetaRecord, ParameterRecord, RecordKind, StepRecord};
use tracing::debug;

use crate::codec::{encode_meta, encode_parameters, encode_step};
use crate::error::DemoError;
use crate::frame::{write_frame, META_RECORD_END};

/// Recorder API version written into every meta record.
pub const API_VERSION: u16 = 1;

/// Writes a demonstration to a seekable byte stream.
///
/// Generic over `W: Write + Seek` so tests can use `Cursor<Vec<u8>>` and
/// production code can use `File`.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
///
/// use mimic_core::{ActionSpaceType, ParameterRecord, StepRecord};
/// use mimic_demo::codec::BinaryCodec;
/// use mimic_demo::scanner::scan;
/// use mimic_demo::writer::DemoWriter;
///
/// let params = ParameterRecord {
///     brain_name: "3dball".into(),
///     vector_observation_size: 8,
///     num_stacked_vector_observations: 1,
///     vector_action_size: [2].into_iter().collect(),
///     vector_action_space_type: ActionSpaceType::Continuous,
///     camera_resolutions: vec![],
/// };
///
/// let mut writer = DemoWriter::new(Cursor::new(Vec::new()), "expert").unwrap();
/// writer.write_parameters(&params).unwrap();
/// for i in 0..4 {
///     let step = StepRecord { reward: 1.0, done: i == 3, ..StepRecord::default() };
///     writer.write_step(&step).unwrap();
/// }
/// let bytes = writer.finish().unwrap().into_inner();
///
/// let scanned = scan(&bytes, &BinaryCodec).unwrap();
/// assert_eq!(scanned.meta.number_steps, 4);
/// assert_eq!(scanned.meta.number_episodes, 1);
/// assert_eq!(scanned.meta.mean_reward, 4.0);
/// ```
pub struct DemoWriter<W: Write + Seek> {
    writer: W,
    start: u64,
    name: String,
    parameters_written: bool,
    steps_written: u32,
    episodes: u32,
    episode_reward: f32,
    cumulative_reward: f32,
}

impl<W: Write + Seek> DemoWriter<W> {
    /// Create a writer, reserving the meta region at the current position.
    ///
    /// Fails early if `name` alone would overflow the meta region.
    pub fn new(mut writer: W, name: impl Into<String>) -> Result<Self, DemoError> {
        let name = name.into();
        // Validate against the largest counts so finish() cannot fail on size.
        encode_meta_region(&MetaRecord {
            api_version: API_VERSION,
            demonstration_name: name.clone(),
            number_steps: u32::MAX,
            number_episodes: u32::MAX,
            mean_reward: 0.0,
        })?;
        let start = writer.stream_position()?;
        writer.write_all(&[0u8; META_RECORD_END])?;
        Ok(Self {
            writer,
            start,
            name,
            parameters_written: false,
            steps_written: 0,
            episodes: 0,
            episode_reward: 0.0,
            cumulative_reward: 0.0,
        })
    }

    /// Write the parameter record. Must be called exactly once, before any step.
    pub fn write_parameters(&mut self, params: &ParameterRecord) -> Result<(), DemoError> {
        if self.parameters_written {
            return Err(DemoError::OutOfOrder {
                expected: RecordKind::Step,
                found: RecordKind::Parameters,
            });
        }
        let mut buf = Vec::new();
        write_frame(&mut buf, &encode_parameters(params));
        self.writer.write_all(&buf)?;
        self.parameters_written = true;
        Ok(())
    }

    /// Write one step record and update the episode statistics.
    pub fn write_step(&mut self, step: &StepRecord) -> Result<(), DemoError> {
        if !self.parameters_written {
            return Err(DemoError::OutOfOrder {
                expected: RecordKind::Parameters,
                found: RecordKind::Step,
            });
        }
        let steps_written = self
            .steps_written
            .checked_add(1)
            .ok_or(DemoError::TooManySteps { limit: u32::MAX })?;
        let mut buf = Vec::new();
        write_frame(&mut buf, &encode_step(step));
        self.writer.write_all(&buf)?;

        self.steps_written = steps_written;
        self.episode_reward += step.reward;
        if step.done {
            self.episodes += 1;
            self.cumulative_reward += self.episode_reward;
            self.episode_reward = 0.0;
        }
        Ok(())
    }

    /// Number of step records written so far.
    pub fn steps_written(&self) -> u32 {
        self.steps_written
    }

    /// Number of completed episodes written so far.
    pub fn episodes_written(&self) -> u32 {
        self.episodes
    }

    /// Fill in the meta region and return the underlying sink.
    ///
    /// The sink is left positioned at the end of the stream.
    pub fn finish(mut self) -> Result<W, DemoError> {
        if !self.parameters_written {
            return Err(DemoError::MissingRecord {
                kind: RecordKind::Parameters,
            });
        }
        let mean_reward = if self.episodes == 0 {
            0.0
        } else {
            self.cumulative_reward / self.episodes as f32
        };
        let meta = MetaRecord {
            api_version: API_VERSION,
            demonstration_name: self.name.clone(),
            number_steps: self.steps_written,
            number_episodes: self.episodes,
            mean_reward,
        };
        let region = encode_meta_region(&meta)?;
        let end = self.writer.stream_position()?;
        self.writer.seek(SeekFrom::Start(self.start))?;
        self.writer.write_all(&region)?;
        self.writer.seek(SeekFrom::Start(end))?;
        self.writer.flush()?;
        debug!(
            name = %meta.demonstration_name,
            steps = meta.number_steps,
            episodes = meta.number_episodes,
            "finished demonstration"
        );
        Ok(self.writer)
    }
}

/// Encode `meta` as a framed record padded to exactly [`META_RECORD_END`] bytes.
pub fn encode_meta_region(meta: &MetaRecord) -> Result<Vec<u8>, DemoError> {
    let mut region = Vec::with_capacity(META_RECORD_END);
    write_frame(&mut region, &encode_meta(meta)?);
    if region.len() > META_RECORD_END {
        return Err(DemoError::MetaTooLarge {
            size: region.len(),
            limit: META_RECORD_END,
        });
    }
    region.resize(META_RECORD_END, 0);
    Ok(region)
}

/// Encode a complete demonstration in memory.
pub fn encode_demonstration(
    name: &str,
    params: &ParameterRecord,
    steps: &[StepRecord],
) -> Result<Vec<u8>, DemoError> {
    let mut writer = DemoWriter::new(Cursor::new(Vec::new()), name)?;
    writer.write_parameters(params)?;
    for step in steps {
        writer.write_step(step)?;
    }
    Ok(writer.finish()?.into_inner())
}
