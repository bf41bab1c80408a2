use ndarray::{Array1, Array2};

use crate::environment::State;
use crate::error::{DqnError, Result};

/// One environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: State,
    pub next_state: State,
    pub action: usize,
    pub reward: f32,
    pub done: bool,
}

/// An episode flattened into tensors. Row `i` of every field describes the
/// same transition.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeBatch {
    pub states: Array2<f32>,
    pub next_states: Array2<f32>,
    pub actions: Array1<usize>,
    pub rewards: Array1<f32>,
    /// `1.0` where the transition ended the episode, `0.0` elsewhere.
    pub dones: Array1<f32>,
}

impl EpisodeBatch {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Append-only record of the transitions of the current episode.
///
/// This is not a replay memory: it is drained once per episode and never sampled.
#[derive(Clone, Debug, Default)]
pub struct EpisodeBuffer {
    transitions: Vec<Transition>,
}

impl EpisodeBuffer {
    pub fn new() -> Self {
        EpisodeBuffer { transitions: Vec::new() }
    }

    pub fn store(&mut self, state: State, next_state: State, action: usize, reward: f32, done: bool) {
        self.transitions.push(Transition { state, next_state, action, reward, done });
    }

    /// Convert the stored transitions into an [`EpisodeBatch`].
    pub fn get(&self) -> Result<EpisodeBatch> {
        let n = self.transitions.len();
        let width = self.transitions.first().map_or(0, |t| t.state.len());

        let mut states = Vec::with_capacity(n * width);
        let mut next_states = Vec::with_capacity(n * width);
        for (i, transition) in self.transitions.iter().enumerate() {
            if transition.state.len() != width || transition.next_state.len() != width {
                return Err(DqnError::DimensionMismatch {
                    expected: format!("states of length {}", width),
                    actual: format!(
                        "transition {} with state length {} and next state length {}",
                        i,
                        transition.state.len(),
                        transition.next_state.len()
                    ),
                });
            }
            states.extend(transition.state.iter().copied());
            next_states.extend(transition.next_state.iter().copied());
        }

        Ok(EpisodeBatch {
            states: Array2::from_shape_vec((n, width), states)?,
            next_states: Array2::from_shape_vec((n, width), next_states)?,
            actions: self.transitions.iter().map(|t| t.action).collect(),
            rewards: self.transitions.iter().map(|t| t.reward).collect(),
            dones: self.transitions.iter().map(|t| if t.done { 1.0 } else { 0.0 }).collect(),
        })
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}
