//! Demonstration file framing, scanning, and loading for Mimic.
//!
//! Reads recorded agent demonstrations (`.demo` files) into ordered step
//! records ready for trajectory assembly, and writes them back out.
//!
//! # Architecture
//!
//! - [`FrameReader`] splits a buffer into varint length-delimited frames
//! - [`scan`] classifies one file's frames by position and decodes them
//! - [`DemoLoader`] resolves a file or directory and concatenates files
//! - [`DemoWriter`] records demonstrations in the same layout
//! - [`BinaryCodec`] is the shipped [`RecordDecoder`](mimic_core::RecordDecoder)
//!
//! # Format
//!
//! ```text
//! [varint len][meta record][padding]   <- region ends at byte 33
//! [varint len][parameter record]
//! [varint len][step record] ... [varint len][step record]
//! ```
//!
//! The meta record's declared length does not cover its region; readers
//! always resume at [`META_RECORD_END`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod frame;
pub mod loader;
pub mod scanner;
pub mod writer;

pub use codec::BinaryCodec;
pub use error::DemoError;
pub use frame::{Frame, FrameReader, META_RECORD_END};
pub use loader::{load_demonstration, DemoLoader, Demonstration, LoadOptions, DEMO_EXTENSION};
pub use scanner::{scan, ScannedFile};
pub use writer::{encode_demonstration, DemoWriter};
