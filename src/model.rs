use burn::{
    prelude::*,
    tensor::{activation::relu, backend::AutodiffBackend},
};
use nn::{Linear, LinearConfig};

use crate::types::{NUM_ACTIONS, NUM_FEATURES};

/// A burn module usable as the agent's Q-network
///
/// The agent only needs a forward pass; fitting happens through burn's
/// autodiff and optimizer machinery, so any [`AutodiffModule`](burn::module::AutodiffModule)
/// mapping a batch of feature vectors to a batch of per-class action values works.
///
/// ### Generics
/// - `B`: A burn autodiff backend
pub trait QModel<B: AutodiffBackend>: burn::module::AutodiffModule<B> {
    /// Forward pass through the model
    ///
    /// In shape: `[num_batches, NUM_FEATURES]`
    ///
    /// Out shape: `[num_batches, NUM_ACTIONS]`
    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2>;
}

/// The default Q-network: a small fully-connected net over the 11 URL features
#[derive(Module, Debug)]
pub struct UrlQNet<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
}

#[derive(Config, Debug)]
pub struct ModelConfig {
    #[config(default = 32)]
    fc1_out: usize,
    #[config(default = 32)]
    fc2_out: usize,
}

impl ModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> UrlQNet<B> {
        UrlQNet {
            fc1: LinearConfig::new(NUM_FEATURES, self.fc1_out).init(device),
            fc2: LinearConfig::new(self.fc1_out, self.fc2_out).init(device),
            fc3: LinearConfig::new(self.fc2_out, NUM_ACTIONS).init(device),
        }
    }
}

impl<B: AutodiffBackend> QModel<B> for UrlQNet<B> {
    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(input));
        let x = relu(self.fc2.forward(x));

        self.fc3.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

    use super::*;

    type B = Autodiff<NdArray>;

    #[test]
    fn forward_produces_one_value_per_class() {
        let device = NdArrayDevice::default();
        let model = ModelConfig::new().init::<B>(&device);
        let input = Tensor::<B, 2>::zeros([3, NUM_FEATURES], &device);

        assert_eq!(model.forward(input).dims(), [3, NUM_ACTIONS]);
    }
}
