//! Demonstration records and their positional kinds.

use smallvec::SmallVec;
use std::fmt;

/// Per-branch action sizes.
///
/// Discrete action spaces carry one entry per branch; continuous spaces
/// carry a single entry holding the action dimension. Almost every
/// environment has four branches or fewer, so the sizes live inline.
pub type ActionSizes = SmallVec<[u32; 4]>;

/// The kind of record expected at a given frame position.
///
/// A demonstration file has no per-record type tag: the kind of every
/// record is implied by its index in the stream. This enum is the closed
/// set of those kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Frame 0: file-level metadata.
    Meta,
    /// Frame 1: observation and action space description.
    Parameters,
    /// Frame 2 and later: one time step of agent experience.
    Step,
}

impl RecordKind {
    /// Map a zero-based frame index to the kind of record stored there.
    ///
    /// # Examples
    ///
    /// ```
    /// use mimic_core::RecordKind;
    ///
    /// assert_eq!(RecordKind::for_index(0), RecordKind::Meta);
    /// assert_eq!(RecordKind::for_index(1), RecordKind::Parameters);
    /// assert_eq!(RecordKind::for_index(7), RecordKind::Step);
    /// ```
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => Self::Meta,
            1 => Self::Parameters,
            _ => Self::Step,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meta => write!(f, "meta record"),
            Self::Parameters => write!(f, "parameter record"),
            Self::Step => write!(f, "step record"),
        }
    }
}

/// A decoded record, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// See [`MetaRecord`].
    Meta(MetaRecord),
    /// See [`ParameterRecord`].
    Parameters(ParameterRecord),
    /// See [`StepRecord`].
    Step(StepRecord),
}

impl Record {
    /// The positional kind this record was decoded as.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Meta(_) => RecordKind::Meta,
            Self::Parameters(_) => RecordKind::Parameters,
            Self::Step(_) => RecordKind::Step,
        }
    }
}

/// File-level metadata stored in the first frame.
///
/// `number_steps` gates the scanner: reading stops once that many step
/// records have been decoded, regardless of what follows.
#[derive(Clone, Debug, PartialEq)]
pub struct MetaRecord {
    /// Version of the recorder API that wrote the file.
    pub api_version: u16,
    /// Free-form name of the demonstration.
    pub demonstration_name: String,
    /// Number of step records in the file.
    pub number_steps: u32,
    /// Number of completed episodes in the file.
    pub number_episodes: u32,
    /// Mean cumulative reward over completed episodes.
    pub mean_reward: f32,
}

/// Whether actions are chosen from discrete branches or a continuous vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionSpaceType {
    /// One integer choice per branch.
    Discrete,
    /// A real-valued action vector.
    Continuous,
}

impl fmt::Display for ActionSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete => write!(f, "discrete"),
            Self::Continuous => write!(f, "continuous"),
        }
    }
}

/// Resolution of one visual observation channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CameraResolution {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// `true` for single-channel images, `false` for RGB.
    pub gray_scale: bool,
}

impl CameraResolution {
    /// Number of colour channels per pixel.
    pub fn channels(&self) -> u32 {
        if self.gray_scale {
            1
        } else {
            3
        }
    }
}

/// Shapes of the observation and action spaces an agent was recorded with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterRecord {
    /// Name of the behaviour that produced the demonstration.
    pub brain_name: String,
    /// Length of a single (unstacked) vector observation.
    pub vector_observation_size: u32,
    /// Number of stacked vector observations per step.
    pub num_stacked_vector_observations: u32,
    /// Per-branch action sizes (see [`ActionSizes`]).
    pub vector_action_size: ActionSizes,
    /// Discrete or continuous actions.
    pub vector_action_space_type: ActionSpaceType,
    /// One entry per visual observation channel.
    pub camera_resolutions: Vec<CameraResolution>,
}

impl ParameterRecord {
    /// Number of visual observation channels.
    pub fn num_visual_observations(&self) -> usize {
        self.camera_resolutions.len()
    }

    /// Length of the stacked vector observation carried by each step.
    pub fn vector_observation_len(&self) -> usize {
        self.vector_observation_size as usize * self.num_stacked_vector_observations.max(1) as usize
    }

    /// Length of the action vector carried by each step.
    ///
    /// Discrete spaces store one value per branch; continuous spaces store
    /// a vector of the first declared size. Later sizes of a continuous
    /// space are not part of the step layout.
    pub fn action_len(&self) -> usize {
        match self.vector_action_space_type {
            ActionSpaceType::Discrete => self.vector_action_size.len(),
            ActionSpaceType::Continuous => self
                .vector_action_size
                .first()
                .map_or(0, |&n| n as usize),
        }
    }

    /// Describe the first shape difference between two parameter records.
    ///
    /// Returns `None` when both records imply the same observation and
    /// action shapes. The brain name is not part of the shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use mimic_core::{ActionSpaceType, ParameterRecord};
    /// use smallvec::smallvec;
    ///
    /// let a = ParameterRecord {
    ///     brain_name: "walker".into(),
    ///     vector_observation_size: 8,
    ///     num_stacked_vector_observations: 1,
    ///     vector_action_size: smallvec![2],
    ///     vector_action_space_type: ActionSpaceType::Continuous,
    ///     camera_resolutions: vec![],
    /// };
    /// let mut b = a.clone();
    /// b.brain_name = "walker-2".into();
    /// assert_eq!(a.shape_difference(&b), None);
    ///
    /// b.vector_observation_size = 9;
    /// assert!(a.shape_difference(&b).is_some());
    /// ```
    pub fn shape_difference(&self, other: &Self) -> Option<String> {
        if self.vector_observation_len() != other.vector_observation_len() {
            return Some(format!(
                "vector observation length {} vs {}",
                self.vector_observation_len(),
                other.vector_observation_len()
            ));
        }
        if self.vector_action_space_type != other.vector_action_space_type {
            return Some(format!(
                "action space type {} vs {}",
                self.vector_action_space_type, other.vector_action_space_type
            ));
        }
        if self.vector_action_size != other.vector_action_size {
            return Some(format!(
                "action sizes {:?} vs {:?}",
                self.vector_action_size.as_slice(),
                other.vector_action_size.as_slice()
            ));
        }
        if self.camera_resolutions != other.camera_resolutions {
            return Some(format!(
                "{} visual channels {:?} vs {} visual channels {:?}",
                self.num_visual_observations(),
                self.camera_resolutions,
                other.num_visual_observations(),
                other.camera_resolutions
            ));
        }
        None
    }
}

/// One time step of agent experience.
///
/// Visual observations are kept as the encoded image bytes the recorder
/// wrote; decoding pixels is left to the training side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepRecord {
    /// Identifier of the agent that produced the step.
    pub agent_id: i32,
    /// Stacked vector observation.
    pub vector_observation: Vec<f32>,
    /// One encoded image per visual channel.
    pub visual_observations: Vec<Vec<u8>>,
    /// Action taken on the previous step.
    pub previous_action: Vec<f32>,
    /// Reward received for the previous action.
    pub reward: f32,
    /// `true` when this step terminates an episode.
    pub done: bool,
    /// `true` when the episode ended by hitting its step limit.
    pub max_step_reached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    fn params() -> ParameterRecord {
        ParameterRecord {
            brain_name: "crawler".into(),
            vector_observation_size: 4,
            num_stacked_vector_observations: 3,
            vector_action_size: smallvec![3, 2],
            vector_action_space_type: ActionSpaceType::Discrete,
            camera_resolutions: vec![CameraResolution {
                width: 84,
                height: 84,
                gray_scale: true,
            }],
        }
    }

    #[test]
    fn kinds_follow_position() {
        assert_eq!(RecordKind::for_index(0), RecordKind::Meta);
        assert_eq!(RecordKind::for_index(1), RecordKind::Parameters);
        for i in 2..10 {
            assert_eq!(RecordKind::for_index(i), RecordKind::Step);
        }
    }

    #[test]
    fn derived_lengths() {
        let p = params();
        assert_eq!(p.vector_observation_len(), 12);
        assert_eq!(p.action_len(), 2);
        assert_eq!(p.num_visual_observations(), 1);
        assert_eq!(p.camera_resolutions[0].channels(), 1);

        let mut c = p.clone();
        c.vector_action_space_type = ActionSpaceType::Continuous;
        c.vector_action_size = smallvec![5];
        assert_eq!(c.action_len(), 5);
    }

    #[test]
    fn continuous_action_len_uses_first_size() {
        let mut c = params();
        c.vector_action_space_type = ActionSpaceType::Continuous;
        c.vector_action_size = smallvec![3, 7];
        assert_eq!(c.action_len(), 3);
        c.vector_action_size = smallvec![];
        assert_eq!(c.action_len(), 0);
    }

    #[test]
    fn zero_stack_counts_as_one() {
        let mut p = params();
        p.num_stacked_vector_observations = 0;
        assert_eq!(p.vector_observation_len(), 4);
    }

    #[test]
    fn shape_difference_detects_each_axis() {
        let base = params();
        assert_eq!(base.shape_difference(&base.clone()), None);

        let mut other = base.clone();
        other.num_stacked_vector_observations = 1;
        assert!(base.shape_difference(&other).unwrap().contains("vector observation"));

        let mut other = base.clone();
        other.vector_action_space_type = ActionSpaceType::Continuous;
        assert!(base.shape_difference(&other).unwrap().contains("action space type"));

        let mut other = base.clone();
        other.vector_action_size = smallvec![3, 3];
        assert!(base.shape_difference(&other).unwrap().contains("action sizes"));

        let mut other = base.clone();
        other.camera_resolutions.clear();
        assert!(base.shape_difference(&other).unwrap().contains("visual channels"));
    }

    #[test]
    fn record_reports_its_kind() {
        let step = Record::Step(StepRecord::default());
        assert_eq!(step.kind(), RecordKind::Step);
        assert_eq!(Record::Parameters(params()).kind(), RecordKind::Parameters);
    }

    fn arb_params() -> impl Strategy<Value = ParameterRecord> {
        (
            0u32..32,
            0u32..4,
            prop::collection::vec(1u32..8, 0..4),
            any::<bool>(),
            prop::collection::vec((1u32..128, 1u32..128, any::<bool>()), 0..3),
        )
            .prop_map(|(obs, stacked, sizes, continuous, cams)| ParameterRecord {
                brain_name: "arb".into(),
                vector_observation_size: obs,
                num_stacked_vector_observations: stacked,
                vector_action_size: ActionSizes::from_vec(sizes),
                vector_action_space_type: if continuous {
                    ActionSpaceType::Continuous
                } else {
                    ActionSpaceType::Discrete
                },
                camera_resolutions: cams
                    .into_iter()
                    .map(|(width, height, gray_scale)| CameraResolution {
                        width,
                        height,
                        gray_scale,
                    })
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn shape_difference_is_symmetric(a in arb_params(), b in arb_params()) {
            prop_assert_eq!(
                a.shape_difference(&b).is_some(),
                b.shape_difference(&a).is_some()
            );
            prop_assert_eq!(a.shape_difference(&a.clone()), None);
        }

        #[test]
        fn equal_shapes_imply_equal_lengths(a in arb_params(), b in arb_params()) {
            if a.shape_difference(&b).is_none() {
                prop_assert_eq!(a.vector_observation_len(), b.vector_observation_len());
                prop_assert_eq!(a.action_len(), b.action_len());
                prop_assert_eq!(a.num_visual_observations(), b.num_visual_observations());
            }
        }

        #[test]
        fn every_index_has_a_kind(index in any::<usize>()) {
            let kind = RecordKind::for_index(index);
            prop_assert_eq!(kind == RecordKind::Meta, index == 0);
            prop_assert_eq!(kind == RecordKind::Parameters, index == 1);
        }
    }
}
