//! Step stream to training buffer.

use std::num::NonZeroUsize;

use mimic_core::{ParameterRecord, StepRecord};
use tracing::{debug, trace};

use crate::buffer::TrainingBuffer;
use crate::episode::{transitions, Episode};
use crate::error::BufferError;
use crate::layout::BufferLayout;

/// Build a training buffer from consecutive step records.
///
/// Each pair of neighbouring steps becomes one transition. Transitions
/// accumulate until one lands on a terminal step, at which point the
/// episode is split into sequences of at most `sequence_length`; whatever
/// remains after the last terminal step forms a final episode. Fewer than
/// two steps produce an empty buffer.
///
/// # Errors
///
/// [`BufferError::InvalidSequenceLength`] if `sequence_length` is zero, and
/// [`BufferError::StepShape`] if a step disagrees with `params`.
///
/// # Examples
///
/// ```
/// use mimic_buffer::{build, BufferKey};
/// use mimic_core::{ActionSpaceType, ParameterRecord, StepRecord};
///
/// let params = ParameterRecord {
///     brain_name: "walker".into(),
///     vector_observation_size: 1,
///     num_stacked_vector_observations: 1,
///     vector_action_size: [1].into_iter().collect(),
///     vector_action_space_type: ActionSpaceType::Continuous,
///     camera_resolutions: vec![],
/// };
/// let steps: Vec<StepRecord> = (0..5)
///     .map(|i| StepRecord {
///         vector_observation: vec![i as f32],
///         previous_action: vec![0.0],
///         reward: 1.0,
///         done: i == 2,
///         ..StepRecord::default()
///     })
///     .collect();
///
/// let buffer = build(&steps, &params, 4).unwrap();
/// assert_eq!(buffer.len(), 4);
/// assert_eq!(buffer.episode_count(), 2);
/// let lens: Vec<_> = buffer.sequences().iter().map(|s| s.len).collect();
/// assert_eq!(lens, [2, 2]);
/// ```
pub fn build(
    steps: &[StepRecord],
    params: &ParameterRecord,
    sequence_length: usize,
) -> Result<TrainingBuffer, BufferError> {
    let sequence_length =
        NonZeroUsize::new(sequence_length).ok_or(BufferError::InvalidSequenceLength)?;
    let layout = BufferLayout::new(params);

    let (mut buffer, episode) = transitions(steps).try_fold(
        (TrainingBuffer::new(&layout), Episode::new(&layout)),
        |(mut buffer, mut episode), t| {
            episode.push(&t)?;
            if t.ends_episode() {
                trace!(step = t.index + 1, transitions = episode.len(), "episode boundary");
                buffer.append_episode(episode.take(), sequence_length);
            }
            Ok::<_, BufferError>((buffer, episode))
        },
    )?;
    buffer.append_episode(episode, sequence_length);

    debug!(
        steps = steps.len(),
        transitions = buffer.len(),
        episodes = buffer.episode_count(),
        sequences = buffer.sequences().len(),
        sequence_length = sequence_length.get(),
        "built training buffer"
    );
    Ok(buffer)
}
