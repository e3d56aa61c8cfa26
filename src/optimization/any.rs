use super::{Adagrad, GradientDescent, Optimizer};
use crate::Result;

/// An optimizer chosen at runtime from a configuration.
#[derive(Debug, Clone)]
pub enum AnyOptimizer {
    Adagrad(Adagrad),
    GradientDescent(GradientDescent),
}

impl AnyOptimizer {
    /// Returns the accumulated squared gradients, empty for stateless optimizers.
    pub fn accumulator(&self) -> &[f32] {
        match self {
            AnyOptimizer::Adagrad(o) => o.accumulator(),
            AnyOptimizer::GradientDescent(_) => &[],
        }
    }
}

impl Optimizer for AnyOptimizer {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        match self {
            AnyOptimizer::Adagrad(o) => o.update_params(grad, params),
            AnyOptimizer::GradientDescent(o) => o.update_params(grad, params),
        }
    }
}
