use super::Optimizer;
use crate::{Result, error::check_len};

/// Gradient descent optimization algorithm.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_len("gradient", grad.len(), params.len())?;

        let lr = self.learning_rate;
        params.iter_mut().zip(grad).for_each(|(w, g)| *w -= lr * g);

        Ok(())
    }
}
