use ndarray::{Array1, ArrayView1};

/// A scalar objective over the policy's probabilities and the observed rewards.
pub trait LossFn {
    fn loss(&self, probs: ArrayView1<f32>, rewards: ArrayView1<f32>) -> f32;

    /// Gradient of `loss` with respect to `probs`.
    fn loss_prime(&self, probs: ArrayView1<f32>, rewards: ArrayView1<f32>) -> Array1<f32>;
}
