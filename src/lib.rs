//! A trainable linear scorer.
//!
//! Candidates are scored as the inner product of their dense features with a single weight
//! row. Given a batch of candidates and their rewards, the weights are trained as a softmax
//! policy over the batch with Adagrad, moving probability mass towards rewarded candidates.

pub mod arch;
pub mod builder;
pub mod candidates;
pub mod config;
pub mod error;
pub mod features;
pub mod handle;
pub mod initialization;
pub mod model;
pub mod observe;
pub mod optimization;
pub mod storage;
pub mod training;

pub use builder::ModelBuilder;
pub use candidates::{Candidate, CandidateBatch, RewardPolicy};
pub use config::{OptimizerSpec, ParamGenSpec, ScorerSpec};
pub use error::{Result, ScorerErr};
pub use features::FeatureHasher;
pub use handle::ModelHandle;
pub use model::PolicyModel;
pub use observe::{LogObserver, NoopObserver, StepObserver, StepReport};
pub use storage::ParameterStore;
pub use training::{Dataset, EpochStats, Example, Learner};
