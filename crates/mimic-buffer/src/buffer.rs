//! Column storage with sequence boundaries.

use std::num::NonZeroUsize;

use indexmap::IndexMap;

use crate::column::{Column, ColumnSlice};
use crate::episode::Episode;
use crate::layout::{BufferKey, BufferLayout};

/// A contiguous run of transitions from a single episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sequence {
    /// Index of the first transition in the buffer.
    pub start: usize,
    /// Number of transitions, between 1 and the sequence length.
    pub len: usize,
    /// Zero-based index of the episode this sequence came from.
    pub episode: usize,
}

impl Sequence {
    /// Transition indices covered by this sequence.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Training data in named columns, split into sequences.
///
/// Every column has [`len`](Self::len) entries. Sequences tile the buffer
/// in order without gaps and never cross an episode boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingBuffer {
    columns: IndexMap<BufferKey, Column>,
    sequences: Vec<Sequence>,
    episodes: usize,
    len: usize,
}

impl TrainingBuffer {
    /// An empty buffer with one column per key of `layout`.
    pub fn new(layout: &BufferLayout) -> Self {
        Self {
            columns: layout
                .keys()
                .iter()
                .map(|&key| (key, Column::for_key(key)))
                .collect(),
            sequences: Vec::new(),
            episodes: 0,
            len: 0,
        }
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the buffer holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of episodes appended.
    pub fn episode_count(&self) -> usize {
        self.episodes
    }

    /// Sequence boundaries in buffer order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Column keys in layout order.
    pub fn keys(&self) -> impl Iterator<Item = BufferKey> + '_ {
        self.columns.keys().copied()
    }

    /// The column for `key`, if the layout has one.
    pub fn column(&self, key: BufferKey) -> Option<&Column> {
        self.columns.get(&key)
    }

    /// The column for a field name such as `"rewards"` or `"visual_obs0"`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        BufferKey::from_name(name).and_then(|key| self.column(key))
    }

    /// The `index`-th sequence as a view over every column.
    pub fn chunk(&self, index: usize) -> Option<Chunk<'_>> {
        self.sequences.get(index).map(|&sequence| Chunk {
            buffer: self,
            sequence,
        })
    }

    /// Every sequence in order.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk<'_>> + '_ {
        self.sequences.iter().map(move |&sequence| Chunk {
            buffer: self,
            sequence,
        })
    }

    /// Move an episode's transitions into the buffer, splitting them into
    /// sequences of at most `sequence_length`. Returns the number of
    /// sequences added.
    ///
    /// An empty episode adds nothing and does not count as an episode.
    pub fn append_episode(&mut self, mut episode: Episode, sequence_length: NonZeroUsize) -> usize {
        let n = episode.len();
        if n == 0 {
            return 0;
        }
        for (key, column) in episode.columns_mut() {
            if let Some(dest) = self.columns.get_mut(key) {
                dest.append(column);
            }
        }

        let step = sequence_length.get();
        let before = self.sequences.len();
        let index = self.episodes;
        let base = self.len;
        self.sequences
            .extend((0..n).step_by(step).map(|offset| Sequence {
                start: base + offset,
                len: step.min(n - offset),
                episode: index,
            }));
        self.len += n;
        self.episodes += 1;
        self.sequences.len() - before
    }
}

/// One sequence of a [`TrainingBuffer`].
#[derive(Clone, Copy, Debug)]
pub struct Chunk<'a> {
    buffer: &'a TrainingBuffer,
    sequence: Sequence,
}

impl<'a> Chunk<'a> {
    /// The boundaries of this chunk.
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.sequence.len
    }

    /// Always `false`; sequences are never empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.len == 0
    }

    /// This chunk's entries of the column for `key`.
    pub fn column(&self, key: BufferKey) -> Option<ColumnSlice<'a>> {
        self.buffer
            .columns
            .get(&key)
            .map(|column| column.slice(self.sequence.range()))
    }
}
