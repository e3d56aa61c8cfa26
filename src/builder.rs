use log::info;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    Result,
    config::{OptimizerSpec, ParamGenSpec, ScorerSpec},
    initialization::{ConstParamGen, ParamGen, RandParamGen},
    model::PolicyModel,
    optimization::{Adagrad, AnyOptimizer, GradientDescent},
    storage::ParameterStore,
};

/// Builds `PolicyModel`s given a specification.
#[derive(Default)]
pub struct ModelBuilder;

impl ModelBuilder {
    /// Creates a new `ModelBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `PolicyModel` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the model.
    ///
    /// # Returns
    /// An error if `spec.dim` is zero or the initial weights distribution is invalid.
    pub fn build(&self, spec: &ScorerSpec) -> Result<PolicyModel<AnyOptimizer>> {
        let param_gen = self.resolve_param_gen(spec)?;
        let optimizer = spec.optimizer;
        let store = ParameterStore::new(spec.dim, param_gen, |n| {
            self.resolve_optimizer(optimizer, n)
        })?;

        info!(
            "initialized scorer: dim={} optimizer={:?} init={:?}",
            spec.dim, spec.optimizer, spec.param_gen
        );
        Ok(PolicyModel::new(store))
    }

    fn resolve_param_gen(&self, spec: &ScorerSpec) -> Result<Box<dyn ParamGen>> {
        let param_gen: Box<dyn ParamGen> = match spec.param_gen {
            ParamGenSpec::Const { value } => Box::new(ConstParamGen::new(value)),
            ParamGenSpec::Uniform { low, high } => {
                let rng = self.generate_rng(spec.seed);
                Box::new(RandParamGen::uniform(rng, low, high)?)
            }
            ParamGenSpec::Normal { mean, std_dev } => {
                let rng = self.generate_rng(spec.seed);
                Box::new(RandParamGen::normal(rng, mean, std_dev)?)
            }
            ParamGenSpec::XavierUniform => {
                let rng = self.generate_rng(spec.seed);
                Box::new(RandParamGen::xavier_uniform(rng, spec.dim, 1)?)
            }
        };

        Ok(param_gen)
    }

    fn resolve_optimizer(&self, spec: OptimizerSpec, nparams: usize) -> AnyOptimizer {
        match spec {
            OptimizerSpec::Adagrad {
                learning_rate,
                epsilon,
            } => AnyOptimizer::Adagrad(Adagrad::new(nparams, learning_rate, epsilon)),
            OptimizerSpec::GradientDescent { learning_rate } => {
                AnyOptimizer::GradientDescent(GradientDescent::new(learning_rate))
            }
        }
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
