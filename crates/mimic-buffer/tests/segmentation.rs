//! Integration tests for buffer assembly from step streams.
//!
//! These go through [`build`] and read results back by field name, the way
//! a trainer consumes the buffer.

use mimic_buffer::{build, BufferError, BufferKey, ColumnSlice, TrainingBuffer};
use mimic_core::{ParameterRecord, StepRecord};
use mimic_test_utils::{indexed_steps, vector_params, visual_params};

// ── Helpers ─────────────────────────────────────────────────────

fn chunk_rewards(buffer: &TrainingBuffer) -> Vec<Vec<f32>> {
    buffer
        .chunks()
        .map(|c| match c.column(BufferKey::Rewards) {
            Some(ColumnSlice::Scalars(r)) => r.to_vec(),
            other => panic!("rewards column missing: {other:?}"),
        })
        .collect()
}

fn twelve_transitions() -> (ParameterRecord, Vec<StepRecord>) {
    let params = visual_params(3, &[2, 2], 1);
    let steps = indexed_steps(&params, 13, &[5, 10]);
    (params, steps)
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn n_steps_give_n_minus_one_transitions() {
    let params = vector_params(4, 2);
    for n in [2, 3, 17] {
        let buffer = build(&indexed_steps(&params, n, &[]), &params, 5).unwrap();
        assert_eq!(buffer.len(), n - 1);
        for key in buffer.keys() {
            assert_eq!(buffer.column(key).unwrap().len(), n - 1, "{key}");
        }
    }
}

#[test]
fn chunks_follow_episode_boundaries() {
    let (params, steps) = twelve_transitions();
    let buffer = build(&steps, &params, 3).unwrap();

    // Rewards come from the next step, so transition k carries reward k + 1.
    assert_eq!(
        chunk_rewards(&buffer),
        vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0],
            vec![6.0, 7.0, 8.0],
            vec![9.0, 10.0],
            vec![11.0, 12.0],
        ]
    );
    let episodes: Vec<_> = buffer.sequences().iter().map(|s| s.episode).collect();
    assert_eq!(episodes, vec![0, 0, 1, 1, 2]);
}

#[test]
fn sequence_length_one_gives_one_chunk_per_transition() {
    let (params, steps) = twelve_transitions();
    let buffer = build(&steps, &params, 1).unwrap();
    assert_eq!(buffer.sequences().len(), 12);
    assert!(buffer.chunks().all(|c| c.len() == 1));
}

#[test]
fn long_sequence_length_gives_one_chunk_per_episode() {
    let (params, steps) = twelve_transitions();
    let buffer = build(&steps, &params, 64).unwrap();
    let lens: Vec<_> = buffer.chunks().map(|c| c.len()).collect();
    assert_eq!(lens, vec![5, 5, 2]);
}

#[test]
fn chunk_fields_line_up() {
    let (params, steps) = twelve_transitions();
    let buffer = build(&steps, &params, 3).unwrap();
    let chunk = buffer.chunk(2).unwrap();

    match chunk.column(BufferKey::VisualObs(0)) {
        Some(ColumnSlice::Images(images)) => {
            assert_eq!(images, &[vec![5u8], vec![6u8], vec![7u8]]);
        }
        other => panic!("unexpected visual column {other:?}"),
    }
    match chunk.column(BufferKey::Done) {
        Some(ColumnSlice::Flags(done)) => assert_eq!(done, &[false, false, false]),
        other => panic!("unexpected done column {other:?}"),
    }
    match chunk.column(BufferKey::Actions) {
        Some(ColumnSlice::Vectors(actions)) => assert_eq!(actions[0], vec![6.0, 6.0]),
        other => panic!("unexpected actions column {other:?}"),
    }
}

#[test]
fn shape_error_names_the_field() {
    let (params, mut steps) = twelve_transitions();
    steps[7].visual_observations.clear();
    let err = build(&steps, &params, 3).unwrap_err();
    assert_eq!(
        err,
        BufferError::StepShape {
            step: 7,
            key: BufferKey::VisualObs(0),
            expected: 1,
            found: 0,
        }
    );
    assert_eq!(
        err.to_string(),
        "step 7: visual_obs0 has length 0, parameters declare 1"
    );
}
