//! Positional record classification for a single demonstration file.
//!
//! Frame 0 is the meta record, frame 1 the parameter record, and every
//! later frame a step record. Scanning stops as soon as the number of
//! steps declared by the meta record has been read.

use mimic_core::{MetaRecord, ParameterRecord, Record, RecordDecoder, RecordKind, StepRecord};
use tracing::{debug, trace};

use crate::error::DemoError;
use crate::frame::FrameReader;

/// Everything read from one demonstration file.
#[derive(Clone, Debug, PartialEq)]
pub struct ScannedFile {
    /// The file's meta record.
    pub meta: MetaRecord,
    /// The file's parameter record.
    pub parameters: ParameterRecord,
    /// Step records in file order, exactly `meta.number_steps` of them.
    pub steps: Vec<StepRecord>,
}

impl ScannedFile {
    /// Step count declared by the meta record.
    pub fn expected_steps(&self) -> usize {
        self.meta.number_steps as usize
    }
}

/// Scan one fully loaded demonstration file.
///
/// Bytes after the last declared step are ignored.
///
/// # Examples
///
/// ```
/// use mimic_core::{ActionSpaceType, ParameterRecord, StepRecord};
/// use mimic_demo::codec::BinaryCodec;
/// use mimic_demo::scanner::scan;
/// use mimic_demo::writer::encode_demonstration;
///
/// let params = ParameterRecord {
///     brain_name: "ball".into(),
///     vector_observation_size: 2,
///     num_stacked_vector_observations: 1,
///     vector_action_size: [2].into_iter().collect(),
///     vector_action_space_type: ActionSpaceType::Continuous,
///     camera_resolutions: vec![],
/// };
/// let steps = vec![StepRecord::default(); 3];
/// let bytes = encode_demonstration("ball", &params, &steps).unwrap();
///
/// let scanned = scan(&bytes, &BinaryCodec).unwrap();
/// assert_eq!(scanned.expected_steps(), 3);
/// assert_eq!(scanned.parameters, params);
/// assert_eq!(scanned.steps, steps);
/// ```
pub fn scan<D: RecordDecoder + ?Sized>(bytes: &[u8], decoder: &D) -> Result<ScannedFile, DemoError> {
    if bytes.is_empty() {
        return Err(DemoError::EmptyInput);
    }

    let mut meta: Option<MetaRecord> = None;
    let mut parameters: Option<ParameterRecord> = None;
    let mut steps = Vec::new();
    let mut expected = 0usize;

    for frame in FrameReader::demonstration(bytes) {
        let frame = frame?;
        let kind = RecordKind::for_index(frame.index);
        let record =
            decoder
                .decode(kind, frame.payload)
                .map_err(|source| DemoError::InvalidFormat {
                    kind,
                    frame_index: frame.index,
                    offset: frame.offset,
                    source,
                })?;
        trace!(index = frame.index, offset = frame.offset, %kind, "decoded frame");

        match record {
            Record::Meta(m) => {
                expected = m.number_steps as usize;
                // Every step frame takes at least one byte.
                steps.reserve(expected.min(bytes.len()));
                meta = Some(m);
            }
            Record::Parameters(p) => parameters = Some(p),
            Record::Step(s) => steps.push(s),
        }

        if parameters.is_some() && steps.len() == expected {
            break;
        }
    }

    let meta = meta.ok_or(DemoError::MissingRecord {
        kind: RecordKind::Meta,
    })?;
    let parameters = parameters.ok_or(DemoError::MissingRecord {
        kind: RecordKind::Parameters,
    })?;
    if steps.len() < expected {
        return Err(DemoError::MissingSteps {
            expected,
            found: steps.len(),
        });
    }

    debug!(
        name = %meta.demonstration_name,
        steps = steps.len(),
        episodes = meta.number_episodes,
        "scanned demonstration"
    );
    Ok(ScannedFile {
        meta,
        parameters,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_meta, encode_parameters, encode_step, BinaryCodec};
    use crate::frame::{write_frame, META_RECORD_END};
    use mimic_core::{ActionSpaceType, DecodeError};
    use smallvec::smallvec;

    fn params() -> ParameterRecord {
        ParameterRecord {
            brain_name: "reacher".into(),
            vector_observation_size: 3,
            num_stacked_vector_observations: 1,
            vector_action_size: smallvec![2],
            vector_action_space_type: ActionSpaceType::Continuous,
            camera_resolutions: vec![],
        }
    }

    fn step(i: usize) -> StepRecord {
        StepRecord {
            vector_observation: vec![i as f32; 3],
            previous_action: vec![0.0, i as f32],
            reward: i as f32,
            done: i % 4 == 3,
            ..StepRecord::default()
        }
    }

    fn meta(number_steps: u32) -> MetaRecord {
        MetaRecord {
            api_version: 1,
            demonstration_name: "test".into(),
            number_steps,
            number_episodes: 0,
            mean_reward: 0.0,
        }
    }

    /// Hand-assemble a file: meta region, parameters, then `step_frames`.
    fn file(declared_steps: u32, step_frames: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        write_frame(&mut buf, &encode_meta(&meta(declared_steps)).unwrap());
        buf.resize(META_RECORD_END, 0);
        write_frame(&mut buf, &encode_parameters(&params()));
        for i in 0..step_frames {
            write_frame(&mut buf, &encode_step(&step(i)));
        }
        buf
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(scan(&[], &BinaryCodec), Err(DemoError::EmptyInput)));
    }

    #[test]
    fn reads_declared_steps() {
        let scanned = scan(&file(5, 5), &BinaryCodec).unwrap();
        assert_eq!(scanned.meta, meta(5));
        assert_eq!(scanned.parameters, params());
        assert_eq!(scanned.steps, (0..5).map(step).collect::<Vec<_>>());
    }

    #[test]
    fn stops_at_declared_count_despite_trailing_frames() {
        let scanned = scan(&file(3, 8), &BinaryCodec).unwrap();
        assert_eq!(scanned.steps.len(), 3);
        assert_eq!(scanned.steps[2], step(2));
    }

    #[test]
    fn trailing_garbage_after_last_step_ignored() {
        let mut bytes = file(2, 2);
        bytes.extend_from_slice(&[0xff, 0xff, 0xff]);
        assert_eq!(scan(&bytes, &BinaryCodec).unwrap().steps.len(), 2);
    }

    #[test]
    fn zero_declared_steps_reads_only_parameters() {
        let scanned = scan(&file(0, 4), &BinaryCodec).unwrap();
        assert!(scanned.steps.is_empty());
        assert_eq!(scanned.parameters, params());
    }

    #[test]
    fn early_end_is_missing_steps() {
        assert!(matches!(
            scan(&file(6, 4), &BinaryCodec),
            Err(DemoError::MissingSteps {
                expected: 6,
                found: 4
            })
        ));
    }

    #[test]
    fn huge_declared_count_is_missing_steps() {
        let bytes = file(u32::MAX, 0);
        assert!(matches!(
            scan(&bytes, &BinaryCodec),
            Err(DemoError::MissingSteps { expected, found: 0 }) if expected == u32::MAX as usize
        ));
    }

    #[test]
    fn meta_only_is_missing_parameters() {
        let mut bytes = Vec::new();
        write_frame(&mut bytes, &encode_meta(&meta(0)).unwrap());
        bytes.resize(META_RECORD_END, 0);
        assert!(matches!(
            scan(&bytes, &BinaryCodec),
            Err(DemoError::MissingRecord {
                kind: RecordKind::Parameters
            })
        ));
    }

    #[test]
    fn bad_step_payload_reports_position() {
        let mut bytes = file(2, 1);
        let offset = bytes.len();
        write_frame(&mut bytes, &[1, 2, 3]);
        match scan(&bytes, &BinaryCodec) {
            Err(DemoError::InvalidFormat {
                kind,
                frame_index,
                offset: at,
                source,
            }) => {
                assert_eq!(kind, RecordKind::Step);
                assert_eq!(frame_index, 3);
                assert_eq!(at, offset);
                assert!(matches!(source, DecodeError::Truncated { .. }));
            }
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn bad_meta_payload_is_invalid_format() {
        let mut bytes = Vec::new();
        write_frame(&mut bytes, &[0]);
        bytes.resize(META_RECORD_END, 0);
        assert!(matches!(
            scan(&bytes, &BinaryCodec),
            Err(DemoError::InvalidFormat {
                kind: RecordKind::Meta,
                frame_index: 0,
                ..
            })
        ));
    }

    #[test]
    fn truncated_step_frame_propagates() {
        let mut bytes = file(3, 3);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            scan(&bytes, &BinaryCodec),
            Err(DemoError::TruncatedFrame { index: 4, .. })
        ));
    }
}
