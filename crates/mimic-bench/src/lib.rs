//! Benchmark profiles for the Mimic demonstration pipeline.
//!
//! Provides deterministic synthetic demonstrations for benchmarks and
//! examples:
//!
//! - [`reference_profile`]: vector-only agent, 10K steps
//! - [`visual_profile`]: one 84x84 grayscale camera, 1K steps
//! - [`synthetic_steps`]: seeded step generation for any parameter record

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mimic_core::{
    ActionSizes, ActionSpaceType, CameraResolution, ParameterRecord, StepRecord,
};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parameters of a continuous-control agent with 8 observations and 2 actions.
pub fn reference_params() -> ParameterRecord {
    ParameterRecord {
        brain_name: "reference".into(),
        vector_observation_size: 8,
        num_stacked_vector_observations: 1,
        vector_action_size: ActionSizes::from_slice(&[2]),
        vector_action_space_type: ActionSpaceType::Continuous,
        camera_resolutions: Vec::new(),
    }
}

/// Parameters of a discrete agent observing one 84x84 grayscale camera.
pub fn visual_params() -> ParameterRecord {
    ParameterRecord {
        brain_name: "visual".into(),
        vector_observation_size: 0,
        num_stacked_vector_observations: 1,
        vector_action_size: ActionSizes::from_slice(&[3, 3]),
        vector_action_space_type: ActionSpaceType::Discrete,
        camera_resolutions: vec![CameraResolution {
            width: 84,
            height: 84,
            gray_scale: true,
        }],
    }
}

/// Reference profile: 10K steps in episodes of 200.
pub fn reference_profile(seed: u64) -> (ParameterRecord, Vec<StepRecord>) {
    let params = reference_params();
    let steps = synthetic_steps(&params, 10_000, 200, seed);
    (params, steps)
}

/// Visual profile: 1K steps in episodes of 100, one raw frame per step.
pub fn visual_profile(seed: u64) -> (ParameterRecord, Vec<StepRecord>) {
    let params = visual_params();
    let steps = synthetic_steps(&params, 1_000, 100, seed);
    (params, steps)
}

/// Generate `n` steps shaped for `params`, terminal every `episode_len` steps.
///
/// Values come from a ChaCha8 stream seeded with `seed`, so equal seeds
/// give equal steps. Images are `width * height * channels` random bytes.
pub fn synthetic_steps(
    params: &ParameterRecord,
    n: usize,
    episode_len: usize,
    seed: u64,
) -> Vec<StepRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let episode_len = episode_len.max(1);
    (0..n)
        .map(|i| {
            let vector_observation = (0..params.vector_observation_len())
                .map(|_| unit(&mut rng))
                .collect();
            let visual_observations = params
                .camera_resolutions
                .iter()
                .map(|cam| {
                    let mut image =
                        vec![0u8; (cam.width * cam.height * cam.channels()) as usize];
                    rng.fill_bytes(&mut image);
                    image
                })
                .collect();
            let previous_action = (0..params.action_len()).map(|_| unit(&mut rng)).collect();
            StepRecord {
                agent_id: 0,
                vector_observation,
                visual_observations,
                previous_action,
                reward: unit(&mut rng),
                done: (i + 1) % episode_len == 0,
                max_step_reached: false,
            }
        })
        .collect()
}

/// Uniform `f32` in `[-1, 1)`.
fn unit(rng: &mut ChaCha8Rng) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
}
