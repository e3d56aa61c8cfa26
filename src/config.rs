use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, candidates::RewardPolicy, optimization::Adagrad};

/// The specification of the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Adagrad {
        #[serde(default = "default_learning_rate")]
        learning_rate: f32,
        #[serde(default = "default_epsilon")]
        epsilon: f32,
    },
    GradientDescent {
        #[serde(default = "default_learning_rate")]
        learning_rate: f32,
    },
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        Self::Adagrad {
            learning_rate: default_learning_rate(),
            epsilon: default_epsilon(),
        }
    }
}

fn default_learning_rate() -> f32 {
    Adagrad::DEFAULT_LEARNING_RATE
}

fn default_epsilon() -> f32 {
    Adagrad::DEFAULT_EPSILON
}

/// The specification of the initial weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamGenSpec {
    Const { value: f32 },
    Uniform { low: f32, high: f32 },
    Normal { mean: f32, std_dev: f32 },
    XavierUniform,
}

impl Default for ParamGenSpec {
    fn default() -> Self {
        Self::Const { value: 0. }
    }
}

/// Everything needed to build and train a scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerSpec {
    /// Length of the dense feature vectors and of the weight row.
    pub dim: usize,
    pub optimizer: OptimizerSpec,
    pub param_gen: ParamGenSpec,
    pub seed: Option<u64>,
    pub reward: RewardPolicy,
    /// Passes over the dataset made by the `Learner`.
    pub epochs: usize,
    pub update_weights: bool,
    pub verbose: bool,
}

impl Default for ScorerSpec {
    fn default() -> Self {
        Self {
            dim: 300,
            optimizer: OptimizerSpec::default(),
            param_gen: ParamGenSpec::default(),
            seed: None,
            reward: RewardPolicy::default(),
            epochs: 3,
            update_weights: true,
            verbose: false,
        }
    }
}

impl ScorerSpec {
    /// Parses a spec from its JSON representation, missing fields take their default value.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads and parses a JSON spec file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
