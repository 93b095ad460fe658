//! Error types for demonstration framing, scanning, and loading.

use std::fmt;
use std::io;
use std::path::PathBuf;

use mimic_core::{DecodeError, RecordKind};

/// Errors that can occur while reading or writing demonstration files.
#[derive(Debug)]
pub enum DemoError {
    /// The input path is neither a file nor a directory.
    PathNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },
    /// The directory contains no files with the demonstration extension.
    NoDemoFiles {
        /// The directory that was searched.
        dir: PathBuf,
        /// The extension that was searched for (without the dot).
        extension: String,
    },
    /// A single-file input does not carry the demonstration extension.
    WrongExtension {
        /// The rejected file.
        path: PathBuf,
        /// The extension that was expected (without the dot).
        expected: String,
    },
    /// A file to scan has zero bytes.
    EmptyInput,
    /// A varint length prefix runs past the end of the buffer.
    TruncatedVarint {
        /// Byte offset where the varint starts.
        offset: usize,
    },
    /// A varint length prefix is longer than five bytes or exceeds 32 bits.
    MalformedVarint {
        /// Byte offset where the varint starts.
        offset: usize,
    },
    /// A frame body runs past the end of the buffer.
    TruncatedFrame {
        /// Zero-based index of the frame.
        index: usize,
        /// Byte offset of the frame's length prefix.
        offset: usize,
        /// Bytes the frame declares (or, for the meta region, reserves).
        declared: usize,
        /// Bytes actually left in the buffer.
        available: usize,
    },
    /// A frame payload does not decode as the record kind its position implies.
    InvalidFormat {
        /// Record kind implied by the frame's position.
        kind: RecordKind,
        /// Zero-based index of the frame.
        frame_index: usize,
        /// Byte offset of the frame's length prefix.
        offset: usize,
        /// What the decoder rejected.
        source: DecodeError,
    },
    /// The stream ended before the meta or parameter record.
    MissingRecord {
        /// The record kind that never appeared.
        kind: RecordKind,
    },
    /// The stream ended before the declared number of step records.
    MissingSteps {
        /// Step count declared by the meta record.
        expected: usize,
        /// Step records actually present.
        found: usize,
    },
    /// A later file's parameter record implies different shapes than the first.
    ShapeMismatch {
        /// The file whose parameters disagree.
        path: PathBuf,
        /// Description of the first differing shape.
        detail: String,
    },
    /// A demonstration file could not be read.
    FileRead {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// Scanning a specific file failed.
    InFile {
        /// The file being scanned.
        path: PathBuf,
        /// The scanner error.
        source: Box<DemoError>,
    },
    /// The encoded meta record does not fit in the reserved meta region.
    MetaTooLarge {
        /// Encoded size including the length prefix.
        size: usize,
        /// Size of the reserved region.
        limit: usize,
    },
    /// Records were written out of positional order.
    OutOfOrder {
        /// The record kind the writer expected next.
        expected: RecordKind,
        /// The record kind that was written.
        found: RecordKind,
    },
    /// The step counter would exceed what the meta record can declare.
    TooManySteps {
        /// Largest step count a meta record can hold.
        limit: u32,
    },
    /// An I/O error occurred while writing.
    Io(io::Error),
}

impl DemoError {
    /// Strip [`InFile`](Self::InFile) wrappers and return the underlying error.
    pub fn root(&self) -> &DemoError {
        match self {
            Self::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathNotFound { path } => {
                write!(f, "demonstration path {} does not exist", path.display())
            }
            Self::NoDemoFiles { dir, extension } => write!(
                f,
                "no '.{extension}' files in directory {}",
                dir.display()
            ),
            Self::WrongExtension { path, expected } => write!(
                f,
                "{} is not a '.{expected}' file",
                path.display()
            ),
            Self::EmptyInput => write!(f, "demonstration file is empty"),
            Self::TruncatedVarint { offset } => {
                write!(f, "truncated varint length prefix at byte {offset}")
            }
            Self::MalformedVarint { offset } => {
                write!(f, "varint length prefix at byte {offset} exceeds 32 bits")
            }
            Self::TruncatedFrame {
                index,
                offset,
                declared,
                available,
            } => write!(
                f,
                "truncated frame {index} at byte {offset}: \
                 declared {declared} bytes, {available} available"
            ),
            Self::InvalidFormat {
                kind,
                frame_index,
                offset,
                source,
            } => write!(
                f,
                "frame {frame_index} at byte {offset} is not a valid {kind}: {source}"
            ),
            Self::MissingRecord { kind } => write!(f, "stream ended before the {kind}"),
            Self::MissingSteps { expected, found } => write!(
                f,
                "stream ended after {found} of {expected} declared step records"
            ),
            Self::ShapeMismatch { path, detail } => write!(
                f,
                "parameters in {} disagree with the first file: {detail}",
                path.display()
            ),
            Self::FileRead { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::InFile { path, source } => write!(f, "{}: {source}", path.display()),
            Self::MetaTooLarge { size, limit } => write!(
                f,
                "encoded meta record is {size} bytes, region holds {limit}"
            ),
            Self::OutOfOrder { expected, found } => {
                write!(f, "expected a {expected}, got a {found}")
            }
            Self::TooManySteps { limit } => {
                write!(f, "demonstration already holds the maximum of {limit} steps")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidFormat { source, .. } => Some(source),
            Self::FileRead { source, .. } => Some(source),
            Self::InFile { source, .. } => Some(source.as_ref()),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
