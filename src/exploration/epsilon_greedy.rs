use rand::{thread_rng, Rng};

use super::Choice;

/// Epsilon greedy exploration policy with a multiplicatively decaying
/// epsilon threshold
///
/// Epsilon decays by one step on every [`choose`](Self::choose) call, so the
/// rate is a function of how many times the policy has been invoked, not of
/// wall-clock time or episode count. It never drops below the configured
/// floor and is never reset.
pub struct EpsilonGreedy {
    epsilon: f32,
    floor: f32,
    decay: f32,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy from a starting rate, a floor, and a
    /// per-invocation decay factor
    ///
    /// **Panics** if `start` is not in `[0,1]`, `floor` is not in `[0,start]`,
    /// or `decay` is not in `(0,1]`
    pub fn new(start: f32, floor: f32, decay: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&start),
            "epsilon start must be in the interval [0, 1]"
        );
        assert!(
            (0.0..=start).contains(&floor),
            "epsilon floor must be in the interval [0, start]"
        );
        assert!(
            decay > 0.0 && decay <= 1.0,
            "epsilon decay must be in the interval (0, 1]"
        );
        Self {
            epsilon: start,
            floor,
            decay,
        }
    }

    /// Decay epsilon by one step, then invoke the policy
    pub fn choose(&mut self) -> Choice {
        self.epsilon = (self.epsilon * self.decay).max(self.floor);
        if thread_rng().gen::<f32>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// The current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }
}
