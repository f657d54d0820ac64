use crate::types::{Class, Features};

/// A single unit of experience from the URL stream
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// The feature vector the agent acted on
    pub state: Features,
    /// The classification the agent chose
    pub action: Class,
    /// +1 if the classification matched the ground truth, -1 otherwise
    pub reward: f32,
    /// The feature vector of the next URL in the stream
    pub next_state: Features,
    /// Episode termination flag; the URL stream has no episode boundary,
    /// so drivers always record `false`
    pub done: bool,
}

/// A zipped batch of [transitions](Transition)
#[derive(Clone, Debug)]
pub struct TransitionBatch {
    pub states: Vec<Features>,
    pub actions: Vec<Class>,
    pub rewards: Vec<f32>,
    pub next_states: Vec<Features>,
    pub dones: Vec<bool>,
}

impl TransitionBatch {
    /// Construct a `TransitionBatch` from an iterator of [transitions](Transition)
    /// and a specified batch size
    pub fn from_iter(iter: impl IntoIterator<Item = Transition>, batch_size: usize) -> Self {
        let batch = Self {
            states: Vec::with_capacity(batch_size),
            actions: Vec::with_capacity(batch_size),
            rewards: Vec::with_capacity(batch_size),
            next_states: Vec::with_capacity(batch_size),
            dones: Vec::with_capacity(batch_size),
        };

        iter.into_iter().fold(batch, |mut b, t| {
            b.states.push(t.state);
            b.actions.push(t.action);
            b.rewards.push(t.reward);
            b.next_states.push(t.next_state);
            b.dones.push(t.done);
            b
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_batch_from_iter() {
        let t1 = Transition {
            state: [0.0; 11],
            action: Class::Benign,
            reward: 1.0,
            next_state: [1.0; 11],
            done: false,
        };
        let t2 = Transition {
            state: [1.0; 11],
            action: Class::Phishing,
            reward: -1.0,
            next_state: [0.0; 11],
            done: false,
        };
        let batch = TransitionBatch::from_iter([t1, t2], 2);

        assert_eq!(batch.states, [[0.0; 11], [1.0; 11]], "states zipped");
        assert_eq!(
            batch.actions,
            [Class::Benign, Class::Phishing],
            "actions zipped"
        );
        assert_eq!(batch.rewards, [1.0, -1.0], "rewards zipped");
        assert_eq!(batch.next_states, [[1.0; 11], [0.0; 11]], "next states zipped");
        assert_eq!(batch.dones, [false, false], "dones zipped");
    }
}
