use ndarray::{Array1, ArrayView1};

use super::LossFn;

/// Negative expected reward under the policy: `-Σⱼ probs[j]·rewards[j]`.
///
/// There is no target distribution, minimizing it moves probability mass towards the
/// candidates with the highest rewards.
#[derive(Debug, Default, Clone, Copy)]
pub struct RewardWeighted;

impl RewardWeighted {
    /// Returns a new `RewardWeighted`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for RewardWeighted {
    fn loss(&self, probs: ArrayView1<f32>, rewards: ArrayView1<f32>) -> f32 {
        -(&probs * &rewards).sum()
    }

    fn loss_prime(&self, _probs: ArrayView1<f32>, rewards: ArrayView1<f32>) -> Array1<f32> {
        rewards.mapv(|r| -r)
    }
}
