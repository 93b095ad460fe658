//! The decoder seam between framing and record schema.

use crate::error::DecodeError;
use crate::record::{MetaRecord, ParameterRecord, Record, RecordKind, StepRecord};

/// Turns one frame payload into a structured record.
///
/// Framing code only knows the positional [`RecordKind`] of each frame;
/// everything about the payload layout lives behind this trait. An
/// implementation must be deterministic: the same bytes always decode to
/// the same record.
pub trait RecordDecoder {
    /// Decode the meta record found at frame 0.
    fn decode_meta(&self, payload: &[u8]) -> Result<MetaRecord, DecodeError>;

    /// Decode the parameter record found at frame 1.
    fn decode_parameters(&self, payload: &[u8]) -> Result<ParameterRecord, DecodeError>;

    /// Decode a step record found at frame 2 or later.
    fn decode_step(&self, payload: &[u8]) -> Result<StepRecord, DecodeError>;

    /// Decode `payload` as the record kind that `kind` names.
    fn decode(&self, kind: RecordKind, payload: &[u8]) -> Result<Record, DecodeError> {
        match kind {
            RecordKind::Meta => self.decode_meta(payload).map(Record::Meta),
            RecordKind::Parameters => self.decode_parameters(payload).map(Record::Parameters),
            RecordKind::Step => self.decode_step(payload).map(Record::Step),
        }
    }
}

impl<D: RecordDecoder + ?Sized> RecordDecoder for &D {
    fn decode_meta(&self, payload: &[u8]) -> Result<MetaRecord, DecodeError> {
        (**self).decode_meta(payload)
    }

    fn decode_parameters(&self, payload: &[u8]) -> Result<ParameterRecord, DecodeError> {
        (**self).decode_parameters(payload)
    }

    fn decode_step(&self, payload: &[u8]) -> Result<StepRecord, DecodeError> {
        (**self).decode_step(payload)
    }
}
