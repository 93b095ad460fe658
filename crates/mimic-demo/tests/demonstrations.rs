//! End-to-end demonstration file tests.
//!
//! Each test writes `.demo` files with `DemoWriter` (or by hand, when the
//! layout itself is under test), then reads them back through the scanner
//! or the loader.

use std::fs;
use std::path::Path;

use mimic_core::{RecordKind, StepRecord};
use mimic_demo::codec::encode_meta;
use mimic_demo::frame::write_frame;
use mimic_demo::{
    encode_demonstration, load_demonstration, scan, DemoError, DemoLoader, LoadOptions,
    META_RECORD_END,
};
use mimic_test_utils::{indexed_steps, meta, vector_params, visual_params, ScriptedDecoder};
use tempfile::tempdir;

// ── Helpers ─────────────────────────────────────────────────────

/// A file with a meta region, one parameter frame, and `payloads` as steps.
fn raw_file(declared_steps: u32, payloads: &[&[u8]]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_frame(&mut buf, &encode_meta(&meta(declared_steps)).unwrap());
    buf.resize(META_RECORD_END, 0);
    write_frame(&mut buf, b"params");
    for p in payloads {
        write_frame(&mut buf, p);
    }
    buf
}

fn write_demo(dir: &Path, name: &str, steps: &[StepRecord]) {
    let params = vector_params(3, 2);
    let bytes = encode_demonstration(name, &params, steps).unwrap();
    fs::write(dir.join(format!("{name}.demo")), bytes).unwrap();
}

// ── Decoder seam ────────────────────────────────────────────────

#[test]
fn scanner_delegates_payloads_to_decoder() {
    let params = visual_params(4, &[3, 3], 2);
    let steps = indexed_steps(&params, 3, &[2]);
    let decoder = ScriptedDecoder::new(meta(3), params.clone(), steps.clone());

    let bytes = raw_file(3, &[b"a", b"b", b"c"]);
    let scanned = scan(&bytes, &decoder).unwrap();

    assert_eq!(scanned.parameters, params);
    assert_eq!(scanned.steps, steps);
    assert_eq!(decoder.step_calls(), 3);
}

#[test]
fn step_count_gating_with_trailing_frames() {
    let params = vector_params(2, 1);
    let steps = indexed_steps(&params, 10, &[]);
    let decoder = ScriptedDecoder::new(meta(4), params, steps.clone());

    let bytes = raw_file(4, &[b"1", b"2", b"3", b"4", b"5", b"6"]);
    let scanned = scan(&bytes, &decoder).unwrap();

    assert_eq!(scanned.steps.len(), 4);
    assert_eq!(scanned.steps, steps[..4]);
    // Frames past the declared count are never handed to the decoder.
    assert_eq!(decoder.step_calls(), 4);
}

#[test]
fn decoder_failure_surfaces_as_invalid_format() {
    let params = vector_params(2, 1);
    let decoder =
        ScriptedDecoder::new(meta(3), params.clone(), indexed_steps(&params, 3, &[])).failing_at(1);

    let bytes = raw_file(3, &[b"x", b"y", b"z"]);
    match scan(&bytes, &decoder).unwrap_err() {
        DemoError::InvalidFormat {
            kind, frame_index, ..
        } => {
            assert_eq!(kind, RecordKind::Step);
            assert_eq!(frame_index, 3);
        }
        other => panic!("expected InvalidFormat, got {other:?}"),
    }
}

#[test]
fn custom_decoder_through_loader() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("run.demo"), raw_file(2, &[b"s0", b"s1"])).unwrap();

    let params = vector_params(5, 2);
    let steps = indexed_steps(&params, 2, &[1]);
    let loader = DemoLoader::new(
        ScriptedDecoder::new(meta(2), params.clone(), steps.clone()),
        LoadOptions::default(),
    );
    let demo = loader.load(dir.path()).unwrap();
    assert_eq!(demo.parameters, params);
    assert_eq!(demo.steps, steps);
}

// ── Aggregation ─────────────────────────────────────────────────

#[test]
fn directory_aggregation_sums_counts_and_keeps_first_parameters() {
    let dir = tempdir().expect("tempdir");
    let params = vector_params(3, 2);
    let a = indexed_steps(&params, 7, &[3, 6]);
    let b = indexed_steps(&params, 4, &[3]);
    write_demo(dir.path(), "a", &a);
    write_demo(dir.path(), "b", &b);

    let demo = load_demonstration(dir.path()).unwrap();
    assert_eq!(demo.expected_steps, 11);
    assert_eq!(demo.steps.len(), 11);
    assert_eq!(demo.parameters, params);
    assert_eq!(demo.steps[..7], a[..]);
    assert_eq!(demo.steps[7..], b[..]);
}

#[test]
fn loading_twice_is_identical() {
    let dir = tempdir().expect("tempdir");
    let params = vector_params(3, 2);
    write_demo(dir.path(), "one", &indexed_steps(&params, 5, &[4]));
    write_demo(dir.path(), "two", &indexed_steps(&params, 6, &[2, 5]));

    let first = load_demonstration(dir.path()).unwrap();
    let second = load_demonstration(dir.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn error_names_the_offending_file() {
    let dir = tempdir().expect("tempdir");
    let params = vector_params(3, 2);
    write_demo(dir.path(), "good", &indexed_steps(&params, 3, &[2]));
    fs::write(dir.path().join("worse.demo"), [0x05u8, 0x01]).unwrap();

    let err = load_demonstration(dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("worse.demo"), "{message}");
    assert!(matches!(err.root(), DemoError::TruncatedFrame { index: 0, .. }));
}
