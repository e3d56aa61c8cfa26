use crate::Result;

/// Defines the strategy for updating the weights based on a computed gradient.
pub trait Optimizer {
    /// Updates `params` in place using `grad`.
    ///
    /// # Arguments
    /// * `grad` - The gradient of the loss with respect to `params`.
    /// * `params` - The weights to update.
    ///
    /// # Returns
    /// An `InvalidDimension` error if the sizes of `grad`, `params` and the optimizer's own
    /// state disagree, in which case nothing is modified.
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()>;
}
