//! Buffer field keys and the per-parameter column layout.

use std::fmt;

use mimic_core::ParameterRecord;

/// Identifies one column of a [`TrainingBuffer`](crate::TrainingBuffer).
///
/// Displays as the conventional field name (`"done"`, `"visual_obs0"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferKey {
    /// Episode-termination flag of the next step.
    Done,
    /// Reward received on the next step.
    Rewards,
    /// Encoded image of visual channel `n` at the current step.
    VisualObs(u32),
    /// Vector observation at the current step.
    VectorObs,
    /// Action taken at the current step (recorded on the next step).
    Actions,
    /// Action that led into the current step.
    PrevAction,
}

impl BufferKey {
    /// Parse a field name back into a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mimic_buffer::BufferKey;
    ///
    /// assert_eq!(BufferKey::from_name("rewards"), Some(BufferKey::Rewards));
    /// assert_eq!(BufferKey::from_name("visual_obs2"), Some(BufferKey::VisualObs(2)));
    /// assert_eq!(BufferKey::from_name("visual_obs"), None);
    /// assert_eq!(BufferKey::VisualObs(1).to_string(), "visual_obs1");
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "done" => Some(Self::Done),
            "rewards" => Some(Self::Rewards),
            "vector_obs" => Some(Self::VectorObs),
            "actions" => Some(Self::Actions),
            "prev_action" => Some(Self::PrevAction),
            other => {
                let digits = other.strip_prefix("visual_obs")?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok().map(Self::VisualObs)
            }
        }
    }
}

impl fmt::Display for BufferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::Rewards => write!(f, "rewards"),
            Self::VisualObs(n) => write!(f, "visual_obs{n}"),
            Self::VectorObs => write!(f, "vector_obs"),
            Self::Actions => write!(f, "actions"),
            Self::PrevAction => write!(f, "prev_action"),
        }
    }
}

/// Which columns a buffer holds and what shape each step must have.
///
/// Derived once from the [`ParameterRecord`]. Keys are kept in the order
/// columns are filled for each transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferLayout {
    keys: Vec<BufferKey>,
    num_visual: usize,
    vector_len: Option<usize>,
    action_len: usize,
}

impl BufferLayout {
    /// Derive the layout for `params`.
    ///
    /// The vector observation column exists only when the vector
    /// observation size is non-zero.
    pub fn new(params: &ParameterRecord) -> Self {
        let num_visual = params.num_visual_observations();
        let vector_len =
            (params.vector_observation_size > 0).then(|| params.vector_observation_len());

        let mut keys = vec![BufferKey::Done, BufferKey::Rewards];
        keys.extend((0..num_visual as u32).map(BufferKey::VisualObs));
        if vector_len.is_some() {
            keys.push(BufferKey::VectorObs);
        }
        keys.push(BufferKey::Actions);
        keys.push(BufferKey::PrevAction);

        Self {
            keys,
            num_visual,
            vector_len,
            action_len: params.action_len(),
        }
    }

    /// Column keys in fill order.
    pub fn keys(&self) -> &[BufferKey] {
        &self.keys
    }

    /// Number of visual observation channels.
    pub fn num_visual(&self) -> usize {
        self.num_visual
    }

    /// Expected vector observation length, or `None` if not recorded.
    pub fn vector_len(&self) -> Option<usize> {
        self.vector_len
    }

    /// Expected action vector length.
    pub fn action_len(&self) -> usize {
        self.action_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_test_utils::{vector_params, visual_params};

    #[test]
    fn names_roundtrip() {
        let keys = [
            BufferKey::Done,
            BufferKey::Rewards,
            BufferKey::VisualObs(0),
            BufferKey::VisualObs(12),
            BufferKey::VectorObs,
            BufferKey::Actions,
            BufferKey::PrevAction,
        ];
        for key in keys {
            assert_eq!(BufferKey::from_name(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn malformed_names_rejected() {
        for name in ["", "visual_obs", "visual_obs-1", "visual_obs+1", "Done", "reward"] {
            assert_eq!(BufferKey::from_name(name), None, "{name}");
        }
    }

    #[test]
    fn vector_only_layout() {
        let layout = BufferLayout::new(&vector_params(6, 2));
        assert_eq!(
            layout.keys(),
            &[
                BufferKey::Done,
                BufferKey::Rewards,
                BufferKey::VectorObs,
                BufferKey::Actions,
                BufferKey::PrevAction,
            ]
        );
        assert_eq!(layout.vector_len(), Some(6));
        assert_eq!(layout.action_len(), 2);
    }

    #[test]
    fn visual_layout_without_vector() {
        let layout = BufferLayout::new(&visual_params(0, &[3, 2, 2], 2));
        assert_eq!(
            layout.keys(),
            &[
                BufferKey::Done,
                BufferKey::Rewards,
                BufferKey::VisualObs(0),
                BufferKey::VisualObs(1),
                BufferKey::Actions,
                BufferKey::PrevAction,
            ]
        );
        assert_eq!(layout.vector_len(), None);
        assert_eq!(layout.action_len(), 3);
        assert_eq!(layout.num_visual(), 2);
    }
}
