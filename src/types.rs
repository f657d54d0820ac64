use burn::prelude::*;
use strum::{EnumIter, FromRepr};

use crate::traits::ToTensor;

/// Number of heuristic indicators in a URL feature vector
pub const NUM_FEATURES: usize = 11;

/// Number of classes an agent can assign to a URL
pub const NUM_ACTIONS: usize = 2;

/// A fixed-order numeric encoding of a URL's phishing indicators
///
/// The order is fixed: protocol, IP presence, length, at-symbol, hyphen,
/// subdomain count, anchor suspicion, DNS record absence, request-URL
/// suspicion, domain age, unusual URL.
pub type Features = [f32; NUM_FEATURES];

/// Classification of a URL, doubling as the agent's action space and the
/// ground-truth label of a dataset record
#[derive(FromRepr, EnumIter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
    Benign = 0,
    Phishing = 1,
}

impl Class {
    /// Index of this class in a Q-value row
    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<usize> for Class {
    fn from(value: usize) -> Self {
        Self::from_repr(value).expect("Class::from is only called with valid values [0, 1]")
    }
}

impl<B: Backend> ToTensor<B, 2, Int> for Vec<Class> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2, Int> {
        let len = self.len();
        let data = Data::new(
            self.into_iter().map(|x| x as i32).collect::<Vec<_>>(),
            [len].into(),
        );
        Tensor::from_data(data.convert(), device).unsqueeze_dim(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_round_trips_through_repr() {
        assert_eq!(Class::from_repr(0), Some(Class::Benign));
        assert_eq!(Class::from_repr(1), Some(Class::Phishing));
        assert_eq!(Class::from_repr(2), None);
        assert_eq!(Class::Phishing.index(), 1);
    }
}
