//! Typed per-field storage.

use std::ops::Range;

use crate::layout::BufferKey;

/// All values recorded for one buffer field, in transition order.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Boolean per transition (`done`).
    Flags(Vec<bool>),
    /// One float per transition (`rewards`).
    Scalars(Vec<f32>),
    /// One float vector per transition (observations and actions).
    Vectors(Vec<Vec<f32>>),
    /// One encoded image per transition (`visual_obs{n}`).
    Images(Vec<Vec<u8>>),
}

/// A borrowed range of a [`Column`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnSlice<'a> {
    /// See [`Column::Flags`].
    Flags(&'a [bool]),
    /// See [`Column::Scalars`].
    Scalars(&'a [f32]),
    /// See [`Column::Vectors`].
    Vectors(&'a [Vec<f32>]),
    /// See [`Column::Images`].
    Images(&'a [Vec<u8>]),
}

impl Column {
    /// An empty column of the type `key` stores.
    pub fn for_key(key: BufferKey) -> Self {
        match key {
            BufferKey::Done => Self::Flags(Vec::new()),
            BufferKey::Rewards => Self::Scalars(Vec::new()),
            BufferKey::VisualObs(_) => Self::Images(Vec::new()),
            BufferKey::VectorObs | BufferKey::Actions | BufferKey::PrevAction => {
                Self::Vectors(Vec::new())
            }
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Flags(v) => v.len(),
            Self::Scalars(v) => v.len(),
            Self::Vectors(v) => v.len(),
            Self::Images(v) => v.len(),
        }
    }

    /// `true` if the column has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow entries in `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> ColumnSlice<'_> {
        match self {
            Self::Flags(v) => ColumnSlice::Flags(&v[range]),
            Self::Scalars(v) => ColumnSlice::Scalars(&v[range]),
            Self::Vectors(v) => ColumnSlice::Vectors(&v[range]),
            Self::Images(v) => ColumnSlice::Images(&v[range]),
        }
    }

    /// Borrow the whole column.
    pub fn as_slice(&self) -> ColumnSlice<'_> {
        self.slice(0..self.len())
    }

    /// The entries if this is a [`Column::Flags`].
    pub fn as_flags(&self) -> Option<&[bool]> {
        match self {
            Self::Flags(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// The entries if this is a [`Column::Scalars`].
    pub fn as_scalars(&self) -> Option<&[f32]> {
        match self {
            Self::Scalars(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// The entries if this is a [`Column::Vectors`].
    pub fn as_vectors(&self) -> Option<&[Vec<f32>]> {
        match self {
            Self::Vectors(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// The entries if this is a [`Column::Images`].
    pub fn as_images(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::Images(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Move every entry of `other` onto the end of `self`, leaving `other` empty.
    ///
    /// Both columns must have the same variant; columns are only ever
    /// created through [`Column::for_key`], so a shared key guarantees it.
    pub(crate) fn append(&mut self, other: &mut Column) {
        match (self, other) {
            (Self::Flags(a), Self::Flags(b)) => a.append(b),
            (Self::Scalars(a), Self::Scalars(b)) => a.append(b),
            (Self::Vectors(a), Self::Vectors(b)) => a.append(b),
            (Self::Images(a), Self::Images(b)) => a.append(b),
            _ => unreachable!("column variant is fixed by its key"),
        }
    }
}

impl ColumnSlice<'_> {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Flags(v) => v.len(),
            Self::Scalars(v) => v.len(),
            Self::Vectors(v) => v.len(),
            Self::Images(v) => v.len(),
        }
    }

    /// `true` if the slice has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
