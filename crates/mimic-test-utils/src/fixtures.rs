//! Reusable record fixtures.
//!
//! Indexed steps encode their position in every field, so a test can tell
//! exactly which step a buffer entry was copied from:
//!
//! - `vector_observation[0] == i`
//! - `previous_action == [i; action_len]`
//! - `reward == i`
//! - every visual observation is `[i as u8]`

use mimic_core::{
    ActionSizes, ActionSpaceType, CameraResolution, MetaRecord, ParameterRecord, StepRecord,
};

/// A meta record declaring `number_steps` steps.
pub fn meta(number_steps: u32) -> MetaRecord {
    MetaRecord {
        api_version: 1,
        demonstration_name: "fixture".into(),
        number_steps,
        number_episodes: 0,
        mean_reward: 0.0,
    }
}

/// Continuous-action parameters with no visual channels.
pub fn vector_params(observation_size: u32, action_size: u32) -> ParameterRecord {
    ParameterRecord {
        brain_name: "fixture".into(),
        vector_observation_size: observation_size,
        num_stacked_vector_observations: 1,
        vector_action_size: ActionSizes::from_slice(&[action_size]),
        vector_action_space_type: ActionSpaceType::Continuous,
        camera_resolutions: Vec::new(),
    }
}

/// A square grayscale camera.
pub fn camera(size: u32) -> CameraResolution {
    CameraResolution {
        width: size,
        height: size,
        gray_scale: true,
    }
}

/// Discrete-action parameters with `cameras` visual channels.
pub fn visual_params(observation_size: u32, branches: &[u32], cameras: usize) -> ParameterRecord {
    ParameterRecord {
        brain_name: "fixture".into(),
        vector_observation_size: observation_size,
        num_stacked_vector_observations: 1,
        vector_action_size: ActionSizes::from_slice(branches),
        vector_action_space_type: ActionSpaceType::Discrete,
        camera_resolutions: (0..cameras).map(|_| camera(8)).collect(),
    }
}

/// Step `i` shaped for `params`, terminal if `done`.
pub fn indexed_step(params: &ParameterRecord, i: usize, done: bool) -> StepRecord {
    let mut vector_observation = vec![0.0; params.vector_observation_len()];
    if let Some(first) = vector_observation.first_mut() {
        *first = i as f32;
    }
    StepRecord {
        agent_id: 0,
        vector_observation,
        visual_observations: vec![vec![i as u8]; params.num_visual_observations()],
        previous_action: vec![i as f32; params.action_len()],
        reward: i as f32,
        done,
        max_step_reached: false,
    }
}

/// `n` indexed steps, terminal at each index in `done_at`.
pub fn indexed_steps(params: &ParameterRecord, n: usize, done_at: &[usize]) -> Vec<StepRecord> {
    (0..n)
        .map(|i| indexed_step(params, i, done_at.contains(&i)))
        .collect()
}

/// Builder for one-off step records.
#[derive(Clone, Debug, Default)]
pub struct StepBuilder {
    step: StepRecord,
}

impl StepBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observation(mut self, obs: &[f32]) -> Self {
        self.step.vector_observation = obs.to_vec();
        self
    }

    pub fn image(mut self, bytes: &[u8]) -> Self {
        self.step.visual_observations.push(bytes.to_vec());
        self
    }

    pub fn action(mut self, action: &[f32]) -> Self {
        self.step.previous_action = action.to_vec();
        self
    }

    pub fn reward(mut self, reward: f32) -> Self {
        self.step.reward = reward;
        self
    }

    pub fn done(mut self) -> Self {
        self.step.done = true;
        self
    }

    pub fn build(self) -> StepRecord {
        self.step
    }
}
