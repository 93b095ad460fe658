//! Binary encode/decode for record payloads.
//!
//! All integers and floats are little-endian. Sequences are prefixed with a
//! `u32` element count and strings with a `u32` byte length, except the
//! demonstration name in the meta record, which uses a `u8` length so the
//! whole meta frame fits in the reserved region. A payload must be consumed
//! exactly; leftover bytes are a decode error.

use mimic_core::{
    ActionSizes, ActionSpaceType, CameraResolution, DecodeError, MetaRecord, ParameterRecord,
    RecordDecoder, StepRecord,
};

use crate::error::DemoError;

/// Action space tag for [`ActionSpaceType::Discrete`].
pub const ACTION_SPACE_DISCRETE: u8 = 0;
/// Action space tag for [`ActionSpaceType::Continuous`].
pub const ACTION_SPACE_CONTINUOUS: u8 = 1;

/// Step flag bit: the step ends an episode.
pub const STEP_FLAG_DONE: u8 = 0b01;
/// Step flag bit: the episode ended on its step limit.
pub const STEP_FLAG_MAX_STEP: u8 = 0b10;

/// The record layout shipped with Mimic.
///
/// # Examples
///
/// ```
/// use mimic_core::{RecordDecoder, StepRecord};
/// use mimic_demo::codec::{encode_step, BinaryCodec};
///
/// let step = StepRecord {
///     vector_observation: vec![0.5, -1.0],
///     reward: 1.0,
///     done: true,
///     ..StepRecord::default()
/// };
/// let bytes = encode_step(&step);
/// assert_eq!(BinaryCodec.decode_step(&bytes).unwrap(), step);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryCodec;

impl RecordDecoder for BinaryCodec {
    fn decode_meta(&self, payload: &[u8]) -> Result<MetaRecord, DecodeError> {
        let mut r = PayloadReader::new(payload);
        let meta = MetaRecord {
            api_version: r.u16("api_version")?,
            demonstration_name: r.str8("demonstration_name")?,
            number_steps: r.u32("number_steps")?,
            number_episodes: r.u32("number_episodes")?,
            mean_reward: r.f32("mean_reward")?,
        };
        r.finish()?;
        Ok(meta)
    }

    fn decode_parameters(&self, payload: &[u8]) -> Result<ParameterRecord, DecodeError> {
        let mut r = PayloadReader::new(payload);
        let brain_name = r.str32("brain_name")?;
        let vector_observation_size = r.u32("vector_observation_size")?;
        let num_stacked_vector_observations = r.u32("num_stacked_vector_observations")?;
        let vector_action_space_type = match r.u8("vector_action_space_type")? {
            ACTION_SPACE_DISCRETE => ActionSpaceType::Discrete,
            ACTION_SPACE_CONTINUOUS => ActionSpaceType::Continuous,
            tag => {
                return Err(DecodeError::InvalidValue {
                    field: "vector_action_space_type",
                    detail: format!("unknown tag {tag}"),
                })
            }
        };
        let action_count = r.count("vector_action_size", 4)?;
        let mut vector_action_size = ActionSizes::with_capacity(action_count);
        for _ in 0..action_count {
            vector_action_size.push(r.u32("vector_action_size")?);
        }
        let camera_count = r.count("camera_resolutions", 9)?;
        let mut camera_resolutions = Vec::with_capacity(camera_count);
        for _ in 0..camera_count {
            camera_resolutions.push(CameraResolution {
                width: r.u32("camera_width")?,
                height: r.u32("camera_height")?,
                gray_scale: r.flag("camera_gray_scale")?,
            });
        }
        r.finish()?;
        Ok(ParameterRecord {
            brain_name,
            vector_observation_size,
            num_stacked_vector_observations,
            vector_action_size,
            vector_action_space_type,
            camera_resolutions,
        })
    }

    fn decode_step(&self, payload: &[u8]) -> Result<StepRecord, DecodeError> {
        let mut r = PayloadReader::new(payload);
        let agent_id = r.i32("agent_id")?;
        let reward = r.f32("reward")?;
        let flags = r.u8("flags")?;
        if flags & !(STEP_FLAG_DONE | STEP_FLAG_MAX_STEP) != 0 {
            return Err(DecodeError::InvalidValue {
                field: "flags",
                detail: format!("unknown bits {flags:#04x}"),
            });
        }
        let vector_observation = r.f32_seq("vector_observation")?;
        let previous_action = r.f32_seq("previous_action")?;
        let image_count = r.count("visual_observations", 4)?;
        let mut visual_observations = Vec::with_capacity(image_count);
        for _ in 0..image_count {
            visual_observations.push(r.bytes32("visual_observation")?.to_vec());
        }
        r.finish()?;
        Ok(StepRecord {
            agent_id,
            vector_observation,
            visual_observations,
            previous_action,
            reward,
            done: flags & STEP_FLAG_DONE != 0,
            max_step_reached: flags & STEP_FLAG_MAX_STEP != 0,
        })
    }
}

// ── Encoders ────────────────────────────────────────────────────

/// Encode a meta record payload.
///
/// Fails with [`DemoError::MetaTooLarge`] if the name is longer than 255
/// bytes; the writer applies the tighter region limit itself.
pub fn encode_meta(meta: &MetaRecord) -> Result<Vec<u8>, DemoError> {
    let name = meta.demonstration_name.as_bytes();
    let name_len = u8::try_from(name.len()).map_err(|_| DemoError::MetaTooLarge {
        size: name.len(),
        limit: u8::MAX as usize,
    })?;
    let mut buf = Vec::with_capacity(15 + name.len());
    buf.extend_from_slice(&meta.api_version.to_le_bytes());
    buf.push(name_len);
    buf.extend_from_slice(name);
    buf.extend_from_slice(&meta.number_steps.to_le_bytes());
    buf.extend_from_slice(&meta.number_episodes.to_le_bytes());
    buf.extend_from_slice(&meta.mean_reward.to_le_bytes());
    Ok(buf)
}

/// Encode a parameter record payload.
pub fn encode_parameters(params: &ParameterRecord) -> Vec<u8> {
    let mut buf = Vec::new();
    write_str32(&mut buf, &params.brain_name);
    buf.extend_from_slice(&params.vector_observation_size.to_le_bytes());
    buf.extend_from_slice(&params.num_stacked_vector_observations.to_le_bytes());
    buf.push(match params.vector_action_space_type {
        ActionSpaceType::Discrete => ACTION_SPACE_DISCRETE,
        ActionSpaceType::Continuous => ACTION_SPACE_CONTINUOUS,
    });
    write_count(&mut buf, params.vector_action_size.len());
    for size in &params.vector_action_size {
        buf.extend_from_slice(&size.to_le_bytes());
    }
    write_count(&mut buf, params.camera_resolutions.len());
    for cam in &params.camera_resolutions {
        buf.extend_from_slice(&cam.width.to_le_bytes());
        buf.extend_from_slice(&cam.height.to_le_bytes());
        buf.push(u8::from(cam.gray_scale));
    }
    buf
}

/// Encode a step record payload.
pub fn encode_step(step: &StepRecord) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&step.agent_id.to_le_bytes());
    buf.extend_from_slice(&step.reward.to_le_bytes());
    let mut flags = 0;
    if step.done {
        flags |= STEP_FLAG_DONE;
    }
    if step.max_step_reached {
        flags |= STEP_FLAG_MAX_STEP;
    }
    buf.push(flags);
    write_f32_seq(&mut buf, &step.vector_observation);
    write_f32_seq(&mut buf, &step.previous_action);
    write_count(&mut buf, step.visual_observations.len());
    for image in &step.visual_observations {
        write_count(&mut buf, image.len());
        buf.extend_from_slice(image);
    }
    buf
}

fn write_count(buf: &mut Vec<u8>, n: usize) {
    buf.extend_from_slice(&(n as u32).to_le_bytes());
}

fn write_str32(buf: &mut Vec<u8>, s: &str) {
    write_count(buf, s.len());
    buf.extend_from_slice(s.as_bytes());
}

fn write_f32_seq(buf: &mut Vec<u8>, values: &[f32]) {
    write_count(buf, values.len());
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

// ── Payload reader ──────────────────────────────────────────────

/// Cursor over one record payload.
struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated {
                field,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(1, field)?[0])
    }

    fn u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        self.array(field).map(u16::from_le_bytes)
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.array(field).map(u32::from_le_bytes)
    }

    fn i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        self.array(field).map(i32::from_le_bytes)
    }

    fn f32(&mut self, field: &'static str) -> Result<f32, DecodeError> {
        self.array(field).map(f32::from_le_bytes)
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, DecodeError> {
        match self.u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(DecodeError::InvalidValue {
                field,
                detail: format!("expected 0 or 1, got {v}"),
            }),
        }
    }

    /// Read an element count and check that `count * min_elem_size` bytes
    /// remain, so a corrupt count cannot trigger a huge allocation.
    fn count(&mut self, field: &'static str, min_elem_size: usize) -> Result<usize, DecodeError> {
        let n = self.u32(field)? as usize;
        let needed = n.saturating_mul(min_elem_size);
        if needed > self.remaining() {
            return Err(DecodeError::Truncated {
                field,
                needed,
                available: self.remaining(),
            });
        }
        Ok(n)
    }

    fn bytes32(&mut self, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.count(field, 1)?;
        self.take(len, field)
    }

    fn str_from(bytes: &[u8], field: &'static str) -> Result<String, DecodeError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| DecodeError::InvalidValue {
            field,
            detail: format!("invalid UTF-8 string: {e}"),
        })
    }

    fn str8(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.u8(field)? as usize;
        let bytes = self.take(len, field)?;
        Self::str_from(bytes, field)
    }

    fn str32(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let bytes = self.bytes32(field)?;
        Self::str_from(bytes, field)
    }

    fn f32_seq(&mut self, field: &'static str) -> Result<Vec<f32>, DecodeError> {
        let n = self.count(field, 4)?;
        let bytes = self.take(n * 4, field)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(DecodeError::TrailingBytes { count }),
        }
    }
}
