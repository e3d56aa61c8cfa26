use std::fmt::{self, Display};

use log::{debug, info};

use super::{Dataset, Example};
use crate::{
    Result,
    candidates::{CandidateBatch, RewardPolicy},
    config::ScorerSpec,
    features::FeatureHasher,
    handle::ModelHandle,
    observe::LogObserver,
};

/// Aggregated results of one pass over a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochStats {
    pub epoch: usize,
    pub examples: usize,
    /// Examples that went through a training step.
    pub trained: usize,
    pub mean_loss: f32,
    /// Fraction of examples whose best scored candidate is fully rewarded.
    pub accuracy: f32,
    /// Fraction of examples with at least one fully rewarded candidate.
    pub oracle: f32,
}

impl Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "epoch={} examples={} trained={} loss={:.6} accuracy={:.4} oracle={:.4}",
            self.epoch, self.examples, self.trained, self.mean_loss, self.accuracy, self.oracle
        )
    }
}

/// Ranks and trains on every example of a dataset for a number of epochs.
pub struct Learner {
    handle: ModelHandle,
    hasher: FeatureHasher,
    reward: RewardPolicy,
    epochs: usize,
    update_weights: bool,
}

impl Learner {
    /// Returns a new `Learner`.
    ///
    /// # Arguments
    /// * `handle` - An initialized model.
    /// * `hasher` - Densifies the candidates' features, its `dim` must match the model's.
    /// * `reward` - Turns compatibilities into rewards.
    /// * `epochs` - The amount of passes made by `learn`.
    /// * `update_weights` - Whether `learn` trains or only evaluates.
    pub fn new(
        handle: ModelHandle,
        hasher: FeatureHasher,
        reward: RewardPolicy,
        epochs: usize,
        update_weights: bool,
    ) -> Self {
        Self {
            handle,
            hasher,
            reward,
            epochs,
            update_weights,
        }
    }

    /// Builds a fresh model and a `Learner` for it from `spec`.
    pub fn from_spec(spec: &ScorerSpec) -> Result<Self> {
        let handle = ModelHandle::with_observer(LogObserver::new(spec.verbose));
        handle.initialize_with(spec)?;
        let hasher = FeatureHasher::new(spec.dim)?;

        Ok(Self::new(
            handle,
            hasher,
            spec.reward,
            spec.epochs,
            spec.update_weights,
        ))
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn hasher(&self) -> &FeatureHasher {
        &self.hasher
    }

    /// Makes `epochs` passes over `dataset`.
    ///
    /// # Returns
    /// The stats of every epoch.
    pub fn learn(&self, dataset: &Dataset) -> Result<Vec<EpochStats>> {
        let mut stats = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            let epoch_stats = self.pass(epoch, dataset, self.update_weights)?;
            info!("{epoch_stats}");
            stats.push(epoch_stats);
        }

        debug!(
            "hash collisions: {} of {} ({:.4})",
            self.hasher.collisions(),
            self.hasher.collisions() + self.hasher.non_collisions(),
            self.hasher.collision_ratio()
        );

        Ok(stats)
    }

    /// Runs `learn` and closes with an evaluation-only pass over the same `dataset`.
    ///
    /// # Returns
    /// The stats of every training epoch and those of the closing pass.
    pub fn run(&self, dataset: &Dataset) -> Result<(Vec<EpochStats>, EpochStats)> {
        let epochs = self.learn(dataset)?;
        let last = self.evaluate(dataset)?;
        info!("final {last}");

        Ok((epochs, last))
    }

    /// Ranks every example of `dataset` without training.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<EpochStats> {
        self.pass(self.epochs, dataset, false)
    }

    fn pass(&self, epoch: usize, dataset: &Dataset, train: bool) -> Result<EpochStats> {
        let mut stats = EpochStats {
            epoch,
            examples: dataset.len(),
            ..Default::default()
        };
        let mut correct = 0;
        let mut reachable = 0;
        let mut total_loss = 0.;

        for example in dataset.examples() {
            let Some(outcome) = self.process(example, train)? else {
                continue;
            };

            correct += outcome.correct as usize;
            reachable += outcome.reachable as usize;
            if let Some(loss) = outcome.loss {
                total_loss += loss;
                stats.trained += 1;
            }
        }

        if stats.examples > 0 {
            stats.accuracy = correct as f32 / stats.examples as f32;
            stats.oracle = reachable as f32 / stats.examples as f32;
        }
        if stats.trained > 0 {
            stats.mean_loss = total_loss / stats.trained as f32;
        }

        Ok(stats)
    }

    fn process(&self, example: &Example, train: bool) -> Result<Option<Outcome>> {
        let batch = CandidateBatch::assemble(&self.hasher, &example.candidates, self.reward);
        if batch.is_empty() {
            return Ok(None);
        }

        let ranked = self.handle.rank(&batch)?;
        let rewards = batch.rewards();
        let correct = ranked.first().is_some_and(|&(idx, _)| rewards[idx] == 1.);
        let reachable = rewards.iter().any(|r| *r == 1.);

        let loss = if train {
            Some(self.handle.train_step(batch.features(), rewards)?)
        } else {
            None
        };

        Ok(Some(Outcome {
            correct,
            reachable,
            loss,
        }))
    }
}

struct Outcome {
    correct: bool,
    reachable: bool,
    loss: Option<f32>,
}
