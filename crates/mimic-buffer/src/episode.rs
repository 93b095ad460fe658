//! Transitions and the per-episode accumulator.

use std::mem;

use indexmap::IndexMap;
use mimic_core::StepRecord;

use crate::column::Column;
use crate::error::BufferError;
use crate::layout::{BufferKey, BufferLayout};

/// A pair of consecutive step records.
///
/// Outcome fields (`done`, reward, action taken) come from `next`;
/// observations and the previous action come from `current`.
#[derive(Clone, Copy, Debug)]
pub struct Transition<'a> {
    /// Index of `current` in the step stream.
    pub index: usize,
    /// The step the agent acted from.
    pub current: &'a StepRecord,
    /// The step the action led to.
    pub next: &'a StepRecord,
}

impl Transition<'_> {
    /// `true` if this transition ends an episode.
    pub fn ends_episode(&self) -> bool {
        self.next.done
    }
}

/// Pair each step with its successor. The last step has no transition.
///
/// # Examples
///
/// ```
/// use mimic_buffer::transitions;
/// use mimic_core::StepRecord;
///
/// let steps = vec![StepRecord::default(); 4];
/// assert_eq!(transitions(&steps).count(), 3);
/// assert_eq!(transitions(&steps[..1]).count(), 0);
/// ```
pub fn transitions(steps: &[StepRecord]) -> impl Iterator<Item = Transition<'_>> + '_ {
    steps
        .windows(2)
        .enumerate()
        .map(|(index, pair)| Transition {
            index,
            current: &pair[0],
            next: &pair[1],
        })
}

/// Columns accumulated since the last episode boundary.
///
/// Every column always has the same length: [`push`](Self::push) checks
/// the whole transition before writing any of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    layout: BufferLayout,
    columns: IndexMap<BufferKey, Column>,
    len: usize,
}

impl Episode {
    /// An empty accumulator for `layout`.
    pub fn new(layout: &BufferLayout) -> Self {
        Self {
            layout: layout.clone(),
            columns: layout
                .keys()
                .iter()
                .map(|&key| (key, Column::for_key(key)))
                .collect(),
            len: 0,
        }
    }

    /// Number of transitions accumulated.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The accumulated column for `key`.
    pub fn column(&self, key: BufferKey) -> Option<&Column> {
        self.columns.get(&key)
    }

    /// Take the accumulated transitions, leaving `self` empty.
    pub fn take(&mut self) -> Episode {
        let empty = Episode::new(&self.layout);
        mem::replace(self, empty)
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = (&BufferKey, &mut Column)> {
        self.columns.iter_mut()
    }

    /// Append one transition to every column.
    pub fn push(&mut self, t: &Transition<'_>) -> Result<(), BufferError> {
        self.check(t)?;
        for (key, column) in self.columns.iter_mut() {
            match (key, column) {
                (BufferKey::Done, Column::Flags(v)) => v.push(t.next.done),
                (BufferKey::Rewards, Column::Scalars(v)) => v.push(t.next.reward),
                (BufferKey::VisualObs(n), Column::Images(v)) => {
                    v.push(t.current.visual_observations[*n as usize].clone())
                }
                (BufferKey::VectorObs, Column::Vectors(v)) => {
                    v.push(t.current.vector_observation.clone())
                }
                (BufferKey::Actions, Column::Vectors(v)) => v.push(t.next.previous_action.clone()),
                (BufferKey::PrevAction, Column::Vectors(v)) => {
                    v.push(t.current.previous_action.clone())
                }
                _ => unreachable!("column variant is fixed by its key"),
            }
        }
        self.len += 1;
        Ok(())
    }

    fn check(&self, t: &Transition<'_>) -> Result<(), BufferError> {
        let shape = |step: usize, key: BufferKey, expected: usize, found: usize| {
            if expected == found {
                Ok(())
            } else {
                Err(BufferError::StepShape {
                    step,
                    key,
                    expected,
                    found,
                })
            }
        };
        let current = t.index;
        let next = t.index + 1;
        let action_len = self.layout.action_len();

        // Report the first channel that is missing or unexpected.
        let visual = t.current.visual_observations.len();
        let num_visual = self.layout.num_visual();
        shape(
            current,
            BufferKey::VisualObs(visual.min(num_visual) as u32),
            num_visual,
            visual,
        )?;
        if let Some(len) = self.layout.vector_len() {
            shape(
                current,
                BufferKey::VectorObs,
                len,
                t.current.vector_observation.len(),
            )?;
        }
        shape(
            current,
            BufferKey::PrevAction,
            action_len,
            t.current.previous_action.len(),
        )?;
        shape(
            next,
            BufferKey::Actions,
            action_len,
            t.next.previous_action.len(),
        )?;
        Ok(())
    }
}
