use std::path::Path;

use burn::{
    optim::{GradientsParams, Optimizer},
    prelude::*,
    record::{BinFileRecorder, FullPrecisionSettings, Recorder, RecorderError},
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use log::{debug, info};
use nn::loss::{MseLoss, Reduction};
use rand::{seq::IteratorRandom, thread_rng};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::{
    config::AgentConfig,
    exploration::{Choice, EpsilonGreedy},
    memory::{ReplayMemory, Transition},
    model::QModel,
    traits::ToTensor,
    types::{Class, Features},
};

/// Error raised by agent persistence operations
///
/// Fatal to the run; there is no retry policy.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to persist or restore model parameters: {0}")]
    Persistence(#[from] RecorderError),
}

type ModelRecorder = BinFileRecorder<FullPrecisionSettings>;

/// A Deep Q Network agent classifying URL feature vectors
///
/// Holds the policy network being trained, a stale target copy used only to
/// compute TD targets, a bounded replay memory of past transitions, and the
/// epsilon-greedy exploration state.
///
/// The target network starts independently initialized and is aligned with
/// the policy network only by [`restore`](Self::restore); training steps
/// never touch it.
///
/// ### Generics
/// - `B`: A burn autodiff backend
/// - `M`: The [`QModel`] used for the policy and target networks
/// - `O`: An [`Optimizer`]
pub struct UrlAgent<B, M, O>
where
    B: AutodiffBackend,
{
    policy_net: Option<M>,
    target_net: Option<M>,
    memory: ReplayMemory,
    optimizer: O,
    loss: MseLoss<B>,
    exploration: EpsilonGreedy,
    gamma: f32,
    lr: f64,
    batch_size: usize,
    device: B::Device,
}

impl<B, M, O> UrlAgent<B, M, O>
where
    B: AutodiffBackend,
    M: QModel<B>,
    O: Optimizer<M, B>,
    Vec<Features>: ToTensor<B, 2, Float>,
    Vec<f32>: ToTensor<B, 1, Float>,
{
    /// Initialize a new `UrlAgent`
    ///
    /// ### Arguments
    /// - `policy_net`, `target_net`: Two independently initialized instances
    ///   of the same [`QModel`] architecture
    /// - `optimizer`: The [`Optimizer`] used to train the policy network
    /// - `config`: Hyperparameters, copied at construction
    /// - `device`: The device both networks live on
    pub fn new(
        policy_net: M,
        target_net: M,
        optimizer: O,
        config: &AgentConfig,
        device: B::Device,
    ) -> Self {
        Self {
            policy_net: Some(policy_net),
            target_net: Some(target_net),
            memory: ReplayMemory::new(config.memory_capacity),
            optimizer,
            loss: MseLoss::new(),
            exploration: EpsilonGreedy::new(
                config.epsilon_start,
                config.epsilon_floor,
                config.epsilon_decay,
            ),
            gamma: config.gamma,
            lr: config.lr,
            batch_size: config.batch_size,
            device,
        }
    }

    /// Choose a classification for `state` under the epsilon-greedy policy
    ///
    /// Decays the exploration rate by one step; the rate is a function of how
    /// many times this method has been invoked.
    pub fn act(&mut self, state: &Features) -> Class {
        match self.exploration.choose() {
            Choice::Explore => Class::iter().choose(&mut thread_rng()).unwrap(),
            Choice::Exploit => self.greedy_action(state),
        }
    }

    /// Choose the classification with the maximal predicted action value
    ///
    /// Pure exploitation: no randomness, no exploration decay. Ties resolve
    /// to the lowest class index.
    pub fn exploit(&self, state: &Features) -> Class {
        self.greedy_action(state)
    }

    /// Store a transition in replay memory, evicting the oldest when full
    pub fn record(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Perform one training step on the policy network
    ///
    /// Samples a batch of transitions, computes TD targets against the target
    /// network, and applies one optimizer step to the policy network only.
    ///
    /// ### Returns
    /// - `Some(loss)` once replay memory holds at least a full batch
    /// - `None` otherwise
    pub fn learn(&mut self) -> Option<f32> {
        let batch = self.memory.sample_zipped(self.batch_size)?;

        let states = batch.states.to_tensor(&self.device);
        let next_states = batch.next_states.to_tensor(&self.device);
        let actions = batch.actions.to_tensor(&self.device);
        let rewards = batch.rewards.to_tensor(&self.device);
        let not_done = batch
            .dones
            .iter()
            .map(|&done| if done { 0.0 } else { 1.0 })
            .collect::<Vec<f32>>()
            .to_tensor(&self.device);

        let policy_net = self.policy_net.take().unwrap();
        let target_net = self.target_net.take().unwrap();

        // Q values of the actions actually taken in each sampled state
        let q_values = policy_net.forward(states).gather(1, actions).squeeze(1);

        // Maximum Q value obtainable from each next state, per the stale target copy
        let max_next_q_values = target_net
            .forward(next_states)
            .max_dim(1)
            .detach()
            .squeeze(1);

        let targets = td_targets(rewards, not_done, max_next_q_values, self.gamma);

        let loss = self.loss.forward(q_values, targets, Reduction::Mean);
        let grads = GradientsParams::from_grads(loss.backward(), &policy_net);

        self.policy_net = Some(self.optimizer.step(self.lr, policy_net, grads));
        self.target_net = Some(target_net);

        let loss = loss.into_scalar().elem::<f32>();
        debug!("training step loss: {loss}");
        Some(loss)
    }

    /// Write the policy network's parameters to `path`
    ///
    /// The file format is delegated to the recorder; the recorder appends its
    /// own file extension to `path`.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<(), AgentError> {
        let recorder = ModelRecorder::new();
        self.policy_net
            .as_ref()
            .unwrap()
            .clone()
            .save_file(path.as_ref().to_path_buf(), &recorder)?;
        info!("persisted model parameters to {}", path.as_ref().display());
        Ok(())
    }

    /// Load previously persisted parameters into both networks
    ///
    /// This is the only point at which the target network is synchronized
    /// with the policy network.
    pub fn restore<P: AsRef<Path>>(&mut self, path: P) -> Result<(), AgentError> {
        let recorder = ModelRecorder::new();
        let policy_record = recorder.load(path.as_ref().to_path_buf(), &self.device)?;
        let target_record = recorder.load(path.as_ref().to_path_buf(), &self.device)?;
        self.policy_net = Some(self.policy_net.take().unwrap().load_record(policy_record));
        self.target_net = Some(self.target_net.take().unwrap().load_record(target_record));
        info!("restored model parameters from {}", path.as_ref().display());
        Ok(())
    }

    /// The current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon()
    }

    /// Number of transitions currently held in replay memory
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    fn greedy_action(&self, state: &Features) -> Class {
        let input = vec![*state].to_tensor(&self.device);
        let q_values = self
            .policy_net
            .as_ref()
            .unwrap()
            .forward(input)
            .into_data()
            .value;

        // Stable argmax: ties resolve to the lowest class index
        let mut best = 0;
        let mut best_q = q_values[0].elem::<f32>();
        for (i, q) in q_values.into_iter().enumerate().skip(1) {
            let q = q.elem::<f32>();
            if q > best_q {
                best = i;
                best_q = q;
            }
        }
        Class::from(best)
    }
}

/// TD regression targets: `reward + (1 - done) * gamma * max_next`
fn td_targets<B: Backend>(
    rewards: Tensor<B, 1>,
    not_done: Tensor<B, 1>,
    max_next_q_values: Tensor<B, 1>,
    gamma: f32,
) -> Tensor<B, 1> {
    rewards + max_next_q_values * not_done * gamma
}
