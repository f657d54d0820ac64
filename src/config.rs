use burn::prelude::*;

/// Hyperparameters for a [`UrlAgent`](crate::agent::UrlAgent)
///
/// Constructed once and passed to the agent by reference; the agent copies
/// what it needs and never mutates the config.
#[derive(Config, Debug)]
pub struct AgentConfig {
    /// Maximum number of transitions held in replay memory
    #[config(default = 2000)]
    pub memory_capacity: usize,
    /// Number of transitions sampled per training step
    #[config(default = 32)]
    pub batch_size: usize,
    /// Discount factor applied to the estimated future value
    #[config(default = 0.95)]
    pub gamma: f32,
    /// Initial exploration rate
    #[config(default = 1.0)]
    pub epsilon_start: f32,
    /// Exploration rate floor
    #[config(default = 0.1)]
    pub epsilon_floor: f32,
    /// Multiplicative exploration decay applied once per policy invocation
    #[config(default = 0.999999)]
    pub epsilon_decay: f32,
    /// Learning rate for the optimizer
    #[config(default = 1e-3)]
    pub lr: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = AgentConfig::new();
        assert_eq!(config.memory_capacity, 2000);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.gamma, 0.95);
        assert_eq!(config.epsilon_start, 1.0);
        assert_eq!(config.epsilon_floor, 0.1);
        assert_eq!(config.epsilon_decay, 0.999999);
        assert_eq!(config.lr, 1e-3);
    }
}
