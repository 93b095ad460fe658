//! Test utilities and record fixtures for Mimic development.
//!
//! Provides parameter and step-record builders ([`vector_params`],
//! [`indexed_steps`]) and a [`ScriptedDecoder`] that hands out
//! preconfigured records regardless of payload bytes, for exercising the
//! framing and scanning layers without a real record encoding.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use mimic_core::{DecodeError, MetaRecord, ParameterRecord, RecordDecoder, StepRecord};

pub use fixtures::{
    camera, indexed_step, indexed_steps, meta, vector_params, visual_params, StepBuilder,
};

/// Decoder that ignores payload contents and returns scripted records.
///
/// Step records are handed out in order, one per `decode_step` call. Once
/// the script is exhausted, or when the call index equals `fail_at`, the
/// decoder fails with [`DecodeError::InvalidValue`].
pub struct ScriptedDecoder {
    pub meta: MetaRecord,
    pub parameters: ParameterRecord,
    pub steps: Vec<StepRecord>,
    pub fail_at: Option<usize>,
    calls: AtomicUsize,
}

impl ScriptedDecoder {
    pub fn new(meta: MetaRecord, parameters: ParameterRecord, steps: Vec<StepRecord>) -> Self {
        Self {
            meta,
            parameters,
            steps,
            fail_at: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the `n`-th (zero-based) `decode_step` call.
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Number of `decode_step` calls so far.
    pub fn step_calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RecordDecoder for ScriptedDecoder {
    fn decode_meta(&self, _payload: &[u8]) -> Result<MetaRecord, DecodeError> {
        Ok(self.meta.clone())
    }

    fn decode_parameters(&self, _payload: &[u8]) -> Result<ParameterRecord, DecodeError> {
        Ok(self.parameters.clone())
    }

    fn decode_step(&self, _payload: &[u8]) -> Result<StepRecord, DecodeError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_at == Some(n) {
            return Err(DecodeError::InvalidValue {
                field: "step",
                detail: format!("scripted failure at call {n}"),
            });
        }
        self.steps
            .get(n)
            .cloned()
            .ok_or_else(|| DecodeError::InvalidValue {
                field: "step",
                detail: format!("script exhausted after {} steps", self.steps.len()),
            })
    }
}
