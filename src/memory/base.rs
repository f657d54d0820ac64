use std::collections::VecDeque;

use rand::{thread_rng, Rng};

use super::{Transition, TransitionBatch};

/// A bounded FIFO memory of past [transitions](Transition)
///
/// Once the buffer reaches its capacity, storing a new transition evicts the
/// oldest one. Sampling draws uniformly at random with replacement, so a
/// transition may appear more than once in a batch.
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    /// Construct an empty `ReplayMemory` with a fixed capacity
    ///
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay memory capacity must be positive");
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a new transition to the memory, evicting the oldest if full
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate the stored transitions from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    /// Sample a random batch of transitions from the memory, with replacement
    ///
    /// ### Returns
    /// - `Some(transitions)` if `batch_size` is less than or equal to the buffer length
    /// - `None` otherwise
    pub fn sample(&self, batch_size: usize) -> Option<Vec<Transition>> {
        if batch_size > self.buffer.len() {
            return None;
        }
        let mut rng = thread_rng();
        Some(
            (0..batch_size)
                .map(|_| self.buffer[rng.gen_range(0..self.buffer.len())].clone())
                .collect(),
        )
    }

    /// Sample a random batch of transitions and zip it into a [`TransitionBatch`]
    ///
    /// ### Returns
    /// - `Some(batch)` if `batch_size` is less than or equal to the buffer length
    /// - `None` otherwise
    pub fn sample_zipped(&self, batch_size: usize) -> Option<TransitionBatch> {
        let transitions = self.sample(batch_size)?;
        Some(TransitionBatch::from_iter(transitions, batch_size))
    }
}

#[cfg(test)]
mod tests {
    use crate::types::Class;

    use super::*;

    const MEMORY_CAP: usize = 4;
    const BATCH_SIZE: usize = 2;

    fn transition(reward: f32) -> Transition {
        Transition {
            state: [0.0; 11],
            action: Class::Benign,
            reward,
            next_state: [0.0; 11],
            done: false,
        }
    }

    #[test]
    fn replay_memory_functional() {
        let mut memory = ReplayMemory::new(MEMORY_CAP);

        assert!(
            memory.sample(BATCH_SIZE).is_none(),
            "sample none when too few transitions"
        );
        assert!(
            memory.sample_zipped(BATCH_SIZE).is_none(),
            "sample_zipped none when too few transitions"
        );

        for i in 0..MEMORY_CAP {
            memory.push(transition(i as f32));
        }

        assert!(
            memory.sample(BATCH_SIZE).is_some_and(|b| b.len() == 2),
            "sample works"
        );
        assert!(
            memory
                .sample_zipped(BATCH_SIZE)
                .is_some_and(|b| b.states.len() == 2),
            "sample_zipped works"
        );
    }

    #[test]
    fn replay_memory_evicts_oldest() {
        let mut memory = ReplayMemory::new(MEMORY_CAP);
        for i in 0..MEMORY_CAP + 3 {
            memory.push(transition(i as f32));
        }

        assert_eq!(memory.len(), MEMORY_CAP, "length capped at capacity");
        let rewards = memory.iter().map(|t| t.reward).collect::<Vec<_>>();
        assert_eq!(
            rewards,
            [3.0, 4.0, 5.0, 6.0],
            "the 3 oldest transitions were evicted in order"
        );
    }

    #[test]
    fn sample_draws_from_current_contents() {
        let mut memory = ReplayMemory::new(MEMORY_CAP);
        for i in 0..MEMORY_CAP + 2 {
            memory.push(transition(i as f32));
        }

        // Many draws, each must come from the surviving window [2, 5]
        for _ in 0..50 {
            let batch = memory.sample(BATCH_SIZE).unwrap();
            assert_eq!(batch.len(), BATCH_SIZE);
            for t in batch {
                assert!(
                    (2.0..=5.0).contains(&t.reward),
                    "sampled an evicted transition"
                );
            }
        }
    }

    #[test]
    fn sample_with_replacement_can_fill_any_batch() {
        let mut memory = ReplayMemory::new(MEMORY_CAP);
        for i in 0..MEMORY_CAP {
            memory.push(transition(i as f32));
        }

        // With replacement, a batch as large as the buffer is always available
        let batch = memory.sample(MEMORY_CAP).unwrap();
        assert_eq!(batch.len(), MEMORY_CAP);
        assert!(memory.sample(MEMORY_CAP + 1).is_none(), "guard still holds");
    }
}
