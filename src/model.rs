use log::debug;
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{
    Result,
    arch::{
        Linear,
        loss::{LossFn, RewardWeighted},
        softmax,
    },
    error::{check_finite, check_len},
    observe::{StepObserver, StepReport},
    optimization::Optimizer,
    storage::ParameterStore,
};

/// A linear scorer trained as a softmax policy over batches of candidates.
///
/// Scoring borrows the model immutably, a training step needs `&mut self`, so a model can
/// be read by many at once but only trained by one caller at a time.
#[derive(Debug, Clone)]
pub struct PolicyModel<O: Optimizer> {
    store: ParameterStore<O>,
    linear: Linear,
    loss_fn: RewardWeighted,
}

impl<O: Optimizer> PolicyModel<O> {
    /// Creates a new `PolicyModel` on top of `store`.
    pub fn new(store: ParameterStore<O>) -> Self {
        Self {
            linear: Linear::new(store.len()),
            loss_fn: RewardWeighted::new(),
            store,
        }
    }

    /// Returns the amount of features the model expects.
    pub fn dim(&self) -> usize {
        self.store.len()
    }

    /// Returns the current weights.
    pub fn weights(&self) -> &[f32] {
        self.store.params()
    }

    /// Returns the underlying parameter store.
    pub fn store(&self) -> &ParameterStore<O> {
        &self.store
    }

    /// Scores a single feature vector as its inner product with the weights.
    ///
    /// # Arguments
    /// * `features` - A dense feature vector of length `dim`.
    ///
    /// # Returns
    /// The score, an `InvalidDimension` error if `features` has the wrong length or a
    /// `NumericDegenerate` error if it or the score itself is not finite.
    pub fn score(&self, features: &[f32]) -> Result<f32> {
        check_len("features", features.len(), self.dim())?;
        check_finite("features", features)?;

        let w = ArrayView1::from(self.weights());
        let score = self.linear.dot(w, ArrayView1::from(features))?;
        check_finite("score", [&score])?;

        Ok(score)
    }

    /// Scores every row of `batch`.
    ///
    /// # Arguments
    /// * `batch` - One candidate per row, `dim` columns.
    pub fn scores(&self, batch: ArrayView2<f32>) -> Result<Array1<f32>> {
        check_finite("features", batch.iter())?;

        let w = ArrayView1::from(self.weights());
        let scores = self.linear.forward(w, batch)?;
        check_finite("scores", &scores)?;

        Ok(scores)
    }

    /// Makes one policy-gradient step over a batch of candidates and their rewards.
    ///
    /// The candidates' logits are normalized with a softmax over the batch and the weights
    /// are moved by the optimizer against the gradient of the negative expected reward.
    /// Every check happens before the store is touched, so a failed step leaves the model
    /// exactly as it was. An empty batch is a no-op.
    ///
    /// # Arguments
    /// * `batch` - One candidate per row, `dim` columns.
    /// * `rewards` - One reward per candidate.
    /// * `observer` - Gets the step's report once the weights are updated.
    ///
    /// # Returns
    /// The step's report, which holds the loss.
    pub fn update<S>(
        &mut self,
        batch: ArrayView2<f32>,
        rewards: &[f32],
        observer: &mut S,
    ) -> Result<StepReport>
    where
        S: StepObserver + ?Sized,
    {
        if batch.nrows() == 0 {
            debug!("skipping update over an empty batch");
            return Ok(StepReport::empty());
        }

        check_len("features", batch.ncols(), self.dim())?;
        check_len("rewards", rewards.len(), batch.nrows())?;
        check_finite("features", batch.iter())?;
        check_finite("rewards", rewards)?;

        let rewards = ArrayView1::from(rewards);
        let w = ArrayView1::from(self.weights());

        let logits = self.linear.forward(w, batch)?;
        check_finite("logits", &logits)?;

        let probs = softmax::forward(logits.view());
        check_finite("probabilities", &probs)?;

        let loss = self.loss_fn.loss(probs.view(), rewards);
        let d_probs = self.loss_fn.loss_prime(probs.view(), rewards);
        let d_logits = softmax::backward(probs.view(), d_probs.view());
        let grad = self.linear.backward(batch, d_logits.view())?;
        check_finite("gradient", &grad)?;

        self.store.apply_gradient(&grad.to_vec())?;

        let report = StepReport {
            loss,
            logits,
            probs,
        };
        observer.on_step(&report);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, arr2};

    use super::*;
    use crate::{
        ScorerErr,
        initialization::ConstParamGen,
        observe::NoopObserver,
        optimization::{Adagrad, GradientDescent},
    };

    fn adagrad_model(dim: usize) -> PolicyModel<Adagrad> {
        let store = ParameterStore::new(dim, ConstParamGen::zeros(), |n| {
            Adagrad::new(n, 1.0, 1e-8)
        })
        .unwrap();

        PolicyModel::new(store)
    }

    #[test]
    fn score_is_dot_product() {
        let store = ParameterStore::new(3, ConstParamGen::new(2.), |_| {
            GradientDescent::new(1.)
        })
        .unwrap();
        let model = PolicyModel::new(store);

        assert_eq!(model.score(&[1., 0.5, -1.]).unwrap(), 1.);
    }

    #[test]
    fn overflowing_score_is_degenerate() {
        let store = ParameterStore::new(2, ConstParamGen::new(2.), |_| {
            GradientDescent::new(1.)
        })
        .unwrap();
        let model = PolicyModel::new(store);

        let err = model.score(&[3e38, 3e38]).unwrap_err();
        assert!(matches!(err, ScorerErr::NumericDegenerate { what: "score" }));

        let batch = arr2(&[[1., 0.], [3e38, 3e38]]);
        let err = model.scores(batch.view()).unwrap_err();
        assert!(matches!(err, ScorerErr::NumericDegenerate { what: "scores" }));
    }

    #[test]
    fn score_rejects_wrong_dimension() {
        let model = adagrad_model(2);
        let err = model.score(&[1., 2., 3.]).unwrap_err();

        assert!(matches!(
            err,
            ScorerErr::InvalidDimension {
                got: 3,
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn two_candidate_step() {
        let mut model = adagrad_model(2);
        let batch = arr2(&[[1., 0.], [0., 1.]]);

        let report = model
            .update(batch.view(), &[1., 0.], &mut NoopObserver)
            .unwrap();

        assert!((report.loss + 0.5).abs() < 1e-6);
        assert_eq!(report.logits.to_vec(), vec![0., 0.]);
        assert!(model.weights()[0] > 0.);
        assert!(model.weights()[1] < 0.);
        assert!(model.score(&[1., 0.]).unwrap() > model.score(&[0., 1.]).unwrap());
    }

    #[test]
    fn gradient_matches_closed_form() {
        let store = ParameterStore::new(2, ConstParamGen::new(0.1), |_| {
            GradientDescent::new(1.)
        })
        .unwrap();
        let mut model = PolicyModel::new(store);
        let batch = arr2(&[[1., 2.], [-1., 0.5], [0., 3.]]);
        let rewards = [0.2, 1., 0.];

        let before = model.weights().to_vec();
        let report = model
            .update(batch.view(), &rewards, &mut NoopObserver)
            .unwrap();

        let expected: f32 = report.probs.iter().zip(&rewards).map(|(s, r)| s * r).sum();
        for i in 0..2 {
            let grad: f32 = (0..3)
                .map(|j| -report.probs[j] * (rewards[j] - expected) * batch[[j, i]])
                .sum();
            let step = before[i] - model.weights()[i];
            assert!((step - grad).abs() < 1e-5, "coordinate {i}");
        }
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut model = adagrad_model(3);
        let batch = Array2::<f32>::zeros((0, 3));

        let report = model.update(batch.view(), &[], &mut NoopObserver).unwrap();

        assert!(report.is_empty());
        assert_eq!(model.weights(), &[0., 0., 0.]);
        assert_eq!(model.store().optimizer().accumulator(), &[0., 0., 0.]);
    }

    #[test]
    fn rejected_steps_do_not_mutate() {
        let mut model = adagrad_model(2);
        let batch = arr2(&[[1., 0.], [0., 1.]]);

        assert!(
            model
                .update(batch.view(), &[1.], &mut NoopObserver)
                .is_err()
        );

        let nan_batch = arr2(&[[f32::NAN, 0.], [0., 1.]]);
        let err = model
            .update(nan_batch.view(), &[1., 0.], &mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, ScorerErr::NumericDegenerate { what: "features" }));

        assert_eq!(model.weights(), &[0., 0.]);
        assert_eq!(model.store().optimizer().accumulator(), &[0., 0.]);
    }

    #[test]
    fn observer_sees_every_step() {
        let mut model = adagrad_model(2);
        let batch = arr2(&[[1., 0.], [0., 1.]]);
        let mut losses = Vec::new();

        for _ in 0..3 {
            model
                .update(batch.view(), &[1., 0.], &mut |r: &StepReport| {
                    losses.push(r.loss)
                })
                .unwrap();
        }

        assert_eq!(losses.len(), 3);
        assert!(losses.windows(2).all(|w| w[1] < w[0]));
    }
}
