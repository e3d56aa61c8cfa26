use log::debug;

use crate::{
    Result, ScorerErr,
    initialization::ParamGen,
    optimization::Optimizer,
};

/// Owner of the scoring weight row and of the optimizer that carries its accumulated state.
///
/// The weights can only be read from the outside, the single mutation path is
/// `apply_gradient`, which is private to the crate.
#[derive(Debug, Clone)]
pub struct ParameterStore<O: Optimizer> {
    params: Box<[f32]>,
    optimizer: O,
}

impl<O: Optimizer> ParameterStore<O> {
    /// Creates a new `ParameterStore`.
    ///
    /// # Arguments
    /// * `nparams` - The dimensionality of the weight row, must be positive.
    /// * `param_gen` - A parameter generator for the initial weights.
    /// * `optimizer_factory` - Builds the optimizer for `nparams` parameters.
    ///
    /// # Returns
    /// An `InvalidDimension` error if `nparams` is zero or `param_gen` can't provide
    /// `nparams` values.
    pub fn new<PG, OF>(nparams: usize, mut param_gen: PG, optimizer_factory: OF) -> Result<Self>
    where
        PG: ParamGen,
        OF: FnOnce(usize) -> O,
    {
        if nparams == 0 {
            return Err(ScorerErr::InvalidDimension {
                what: "weights",
                got: 0,
                expected: 1,
            });
        }

        let params = param_gen.fill(nparams)?;
        debug!("allocated parameter store with {nparams} weights");

        Ok(Self {
            params,
            optimizer: optimizer_factory(nparams),
        })
    }

    /// Returns the amount of weights in the store.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// A store always holds at least one weight.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the current weights.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Returns the optimizer and, with it, its accumulated state.
    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Applies one optimizer step with `grad`.
    ///
    /// # Returns
    /// An `InvalidDimension` error if `grad` doesn't match the amount of weights.
    pub(crate) fn apply_gradient(&mut self, grad: &[f32]) -> Result<()> {
        self.optimizer.update_params(grad, &mut self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::check_len, initialization::ConstParamGen};

    #[derive(Debug)]
    struct AddOptimizer;

    impl Optimizer for AddOptimizer {
        fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
            check_len("gradient", grad.len(), params.len())?;
            params.iter_mut().zip(grad).for_each(|(w, g)| *w += g);
            Ok(())
        }
    }

    /// Never yields a value.
    #[derive(Debug)]
    struct Dry;

    impl ParamGen for Dry {
        fn sample(&mut self, _n: usize) -> Option<Vec<f32>> {
            None
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = ParameterStore::new(0, ConstParamGen::zeros(), |_| AddOptimizer).unwrap_err();
        assert!(matches!(err, ScorerErr::InvalidDimension { got: 0, .. }));
    }

    #[test]
    fn starts_from_generated_weights() {
        let store = ParameterStore::new(3, ConstParamGen::new(0.5), |_| AddOptimizer).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.params(), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn dry_generator_is_rejected() {
        let err = ParameterStore::new(4, Dry, |_| AddOptimizer).unwrap_err();
        assert!(matches!(
            err,
            ScorerErr::InvalidDimension {
                got: 0,
                expected: 4,
                ..
            }
        ));
    }

    #[test]
    fn apply_gradient_goes_through_optimizer() {
        let mut store = ParameterStore::new(2, ConstParamGen::zeros(), |_| AddOptimizer).unwrap();

        store.apply_gradient(&[1., -1.]).unwrap();
        assert_eq!(store.params(), &[1., -1.]);

        assert!(store.apply_gradient(&[1.]).is_err());
        assert_eq!(store.params(), &[1., -1.]);
    }
}
