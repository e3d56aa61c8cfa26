use std::sync::Arc;

use log::warn;
use ndarray::ArrayView2;
use parking_lot::{Mutex, RwLock};

use crate::{
    Result, ScorerErr,
    builder::ModelBuilder,
    candidates::{self, CandidateBatch},
    config::ScorerSpec,
    model::PolicyModel,
    observe::{LogObserver, StepObserver},
    optimization::AnyOptimizer,
};

/// Shared access point to a single scorer, as seen from outside the crate.
///
/// The model is created by `initialize` and lives as long as the last clone of the handle.
/// Scoring takes a read lock and can run concurrently, a training step takes the write lock.
#[derive(Clone)]
pub struct ModelHandle {
    model: Arc<RwLock<Option<PolicyModel<AnyOptimizer>>>>,
    observer: Arc<Mutex<Box<dyn StepObserver + Send>>>,
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelHandle {
    /// Creates an uninitialized handle that reports training steps to the log.
    pub fn new() -> Self {
        Self::with_observer(LogObserver::default())
    }

    /// Creates an uninitialized handle that reports training steps to `observer`.
    pub fn with_observer<S>(observer: S) -> Self
    where
        S: StepObserver + Send + 'static,
    {
        Self {
            model: Arc::new(RwLock::new(None)),
            observer: Arc::new(Mutex::new(Box::new(observer))),
        }
    }

    /// Creates the model with `dim` zero weights and the default optimizer.
    ///
    /// # Returns
    /// An `InvalidDimension` error if `dim` is zero or `AlreadyInitialized` if the handle
    /// already holds a model.
    pub fn initialize(&self, dim: usize) -> Result<()> {
        let spec = ScorerSpec {
            dim,
            ..Default::default()
        };

        self.initialize_with(&spec)
    }

    /// Creates the model described by `spec`.
    ///
    /// A handle can only be initialized once, later calls fail with `AlreadyInitialized` and
    /// keep the trained model.
    pub fn initialize_with(&self, spec: &ScorerSpec) -> Result<()> {
        let mut guard = self.model.write();
        if guard.is_some() {
            warn!("rejected second initialization of the scorer");
            return Err(ScorerErr::AlreadyInitialized);
        }

        *guard = Some(ModelBuilder::new().build(spec)?);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.model.read().is_some()
    }

    /// Returns the model's dimensionality.
    pub fn dim(&self) -> Result<usize> {
        self.read(|model| Ok(model.dim()))
    }

    /// Scores a dense feature vector.
    pub fn score(&self, features: &[f32]) -> Result<f32> {
        self.read(|model| model.score(features))
    }

    /// Ranks the candidates of `batch` by descending score.
    ///
    /// # Returns
    /// Pairs of candidate index and score.
    pub fn rank(&self, batch: &CandidateBatch) -> Result<Vec<(usize, f32)>> {
        self.read(|model| {
            if batch.is_empty() {
                return Ok(Vec::new());
            }

            let scores = model.scores(batch.view()?)?;
            Ok(candidates::ranking(scores.view()))
        })
    }

    /// Makes one training step from flat buffers.
    ///
    /// `features` holds the candidates one after the other, so its length must be exactly
    /// `rewards.len() · dim`. Empty `features` are a no-op that returns a loss of `0.0`.
    ///
    /// # Returns
    /// The step's loss.
    pub fn train_step(&self, features: &[f32], rewards: &[f32]) -> Result<f32> {
        let mut guard = self.model.write();
        let model = guard.as_mut().ok_or(ScorerErr::UninitializedModel)?;

        if features.is_empty() {
            return Ok(0.);
        }

        let batch = flat_batch(features, rewards, model.dim())?;
        let mut observer = self.observer.lock();
        let report = model.update(batch, rewards, &mut **observer)?;

        Ok(report.loss)
    }

    /// Returns a copy of the current weights.
    pub fn weights(&self) -> Result<Vec<f32>> {
        self.read(|model| Ok(model.weights().to_vec()))
    }

    /// Returns a copy of the optimizer's accumulated state.
    pub fn accumulator(&self) -> Result<Vec<f32>> {
        self.read(|model| Ok(model.store().optimizer().accumulator().to_vec()))
    }

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&PolicyModel<AnyOptimizer>) -> Result<T>,
    {
        let guard = self.model.read();
        let model = guard.as_ref().ok_or(ScorerErr::UninitializedModel)?;
        f(model)
    }
}

/// Reshapes candidate-major `features` into one row per reward.
fn flat_batch<'a>(
    features: &'a [f32],
    rewards: &[f32],
    dim: usize,
) -> Result<ArrayView2<'a, f32>> {
    let mismatch = || ScorerErr::InvalidDimension {
        what: "features per reward",
        got: features.len(),
        expected: rewards.len() * dim,
    };

    if rewards.is_empty() || features.len() % rewards.len() != 0 {
        return Err(mismatch());
    }

    if features.len() / rewards.len() != dim {
        return Err(mismatch());
    }

    ArrayView2::from_shape((rewards.len(), dim), features).map_err(|_| mismatch())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_batch_is_one_row_per_reward() {
        let features = [1., 2., 3., 4., 5., 6.];
        let batch = flat_batch(&features, &[0., 1.], 3).unwrap();

        assert_eq!(batch.dim(), (2, 3));
        assert_eq!(batch.row(1).to_vec(), vec![4., 5., 6.]);
    }

    #[test]
    fn flat_batch_rejects_inexact_division() {
        let features = [1., 2., 3., 4., 5.];
        assert!(flat_batch(&features, &[0., 1.], 2).is_err());
    }

    #[test]
    fn flat_batch_rejects_missing_rewards() {
        assert!(flat_batch(&[1., 2.], &[], 2).is_err());
    }

    #[test]
    fn flat_batch_rejects_wrong_row_length() {
        let features = [1., 2., 3., 4.];
        assert!(flat_batch(&features, &[0., 1.], 3).is_err());
    }

    #[test]
    fn second_initialization_is_rejected() {
        let handle = ModelHandle::new();
        handle.initialize(2).unwrap();
        handle.train_step(&[1., 0., 0., 1.], &[1., 0.]).unwrap();
        let trained = handle.weights().unwrap();

        let err = handle.initialize(5).unwrap_err();

        assert!(matches!(err, ScorerErr::AlreadyInitialized));
        assert_eq!(handle.weights().unwrap(), trained);
        assert_eq!(handle.dim().unwrap(), 2);
    }

    #[test]
    fn ranking_needs_a_model_even_when_empty() {
        let hasher = crate::FeatureHasher::new(4).unwrap();
        let batch = CandidateBatch::assemble(&hasher, &[], Default::default());
        let handle = ModelHandle::new();

        let err = handle.rank(&batch).unwrap_err();
        assert!(matches!(err, ScorerErr::UninitializedModel));

        handle.initialize(4).unwrap();
        assert!(handle.rank(&batch).unwrap().is_empty());
    }
}
