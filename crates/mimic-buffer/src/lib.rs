//! Trajectory segmentation for Mimic.
//!
//! Turns an ordered stream of [`StepRecord`](mimic_core::StepRecord)s into a
//! [`TrainingBuffer`]: named columns with one entry per transition, split
//! into sequences of bounded length that never straddle an episode end.
//!
//! A transition pairs step `k` with step `k + 1`. Observations and the
//! previous action come from step `k`; the reward, the `done` flag, and
//! the action taken come from step `k + 1`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod builder;
pub mod column;
pub mod episode;
pub mod error;
pub mod layout;

pub use buffer::{Chunk, Sequence, TrainingBuffer};
pub use builder::build;
pub use column::{Column, ColumnSlice};
pub use episode::{transitions, Episode, Transition};
pub use error::BufferError;
pub use layout::{BufferKey, BufferLayout};
