use super::Optimizer;
use crate::{Result, error::check_len};

/// Adagrad: each weight's step is scaled by the inverse square root of the sum of all the
/// squared gradients it has seen so far.
///
/// The accumulator is never reset, so the effective step of a coordinate can only shrink.
#[derive(Debug, Clone)]
pub struct Adagrad {
    learning_rate: f32,
    epsilon: f32,
    accumulator: Box<[f32]>,
}

impl Adagrad {
    pub const DEFAULT_LEARNING_RATE: f32 = 1.0;
    pub const DEFAULT_EPSILON: f32 = 1e-8;

    /// Creates a new `Adagrad` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold state for.
    /// * `learning_rate` - The base step length.
    /// * `epsilon` - Keeps the denominator away from zero on the first steps.
    pub fn new(len: usize, learning_rate: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            epsilon,
            accumulator: vec![0.; len].into_boxed_slice(),
        }
    }

    /// Returns the accumulated squared gradients, one per parameter.
    pub fn accumulator(&self) -> &[f32] {
        &self.accumulator
    }
}

impl Optimizer for Adagrad {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_len("gradient", grad.len(), params.len())?;
        check_len("optimizer state", self.accumulator.len(), params.len())?;

        let Self {
            learning_rate: lr,
            epsilon: eps,
            ..
        } = *self;

        params
            .iter_mut()
            .zip(grad)
            .zip(self.accumulator.iter_mut())
            .for_each(|((p, g), acc)| {
                *acc += g.powi(2);
                *p -= lr * g / (eps + acc.sqrt());
            });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScorerErr;

    #[test]
    fn first_step_is_close_to_learning_rate() {
        let mut adagrad = Adagrad::new(2, 1.0, 1e-8);
        let mut params = [0., 0.];

        adagrad.update_params(&[0.25, -4.], &mut params).unwrap();

        assert!((params[0] + 1.).abs() < 1e-5);
        assert!((params[1] - 1.).abs() < 1e-5);
        assert_eq!(adagrad.accumulator(), &[0.0625, 16.]);
    }

    #[test]
    fn steps_shrink_under_constant_gradient() {
        let mut adagrad = Adagrad::new(1, 1.0, 1e-8);
        let mut params = [0.];
        let mut last_step = f32::INFINITY;

        for _ in 0..10 {
            let before = params[0];
            adagrad.update_params(&[0.5], &mut params).unwrap();
            let step = (params[0] - before).abs();

            assert!(step < last_step);
            last_step = step;
        }
    }

    #[test]
    fn mismatched_gradient_leaves_state_untouched() {
        let mut adagrad = Adagrad::new(2, 1.0, 1e-8);
        let mut params = [1., 2.];

        let err = adagrad.update_params(&[1.], &mut params).unwrap_err();

        assert!(matches!(err, ScorerErr::InvalidDimension { .. }));
        assert_eq!(params, [1., 2.]);
        assert_eq!(adagrad.accumulator(), &[0., 0.]);
    }
}
