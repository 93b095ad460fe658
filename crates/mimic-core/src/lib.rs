//! Record types and the decoder seam for Mimic demonstration files.
//!
//! This is the leaf crate with zero internal dependencies. A demonstration
//! file is a stream of length-delimited records whose schema depends on
//! position: one [`MetaRecord`], one [`ParameterRecord`], then any number of
//! [`StepRecord`]s. The byte-level encoding of each record is not defined
//! here; it is supplied through the [`RecordDecoder`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decode;
pub mod error;
pub mod record;

pub use decode::RecordDecoder;
pub use error::DecodeError;
pub use record::{
    ActionSpaceType, ActionSizes, CameraResolution, MetaRecord, ParameterRecord, Record,
    RecordKind, StepRecord,
};
