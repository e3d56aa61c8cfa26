use std::collections::BTreeMap;

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{Result, ScorerErr, features::FeatureHasher};

/// How a candidate's compatibility with the expected answer becomes its reward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardPolicy {
    /// Only fully compatible candidates get rewarded.
    #[default]
    AllOrNothing,
    /// The compatibility is the reward.
    Partial,
}

impl RewardPolicy {
    pub fn reward(&self, compatibility: f32) -> f32 {
        match self {
            RewardPolicy::AllOrNothing if compatibility == 1. => 1.,
            RewardPolicy::AllOrNothing => 0.,
            RewardPolicy::Partial => compatibility,
        }
    }
}

/// One output proposed for an example, with its named sparse features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub features: BTreeMap<String, f32>,
    pub compatibility: f32,
}

impl Candidate {
    pub fn new<I, K>(features: I, compatibility: f32) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<String>,
    {
        Self {
            features: features.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            compatibility,
        }
    }
}

/// The dense, flat form of a list of candidates.
///
/// `features` is candidate major: values `j·dim..(j+1)·dim` belong to the `j`-th candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBatch {
    dim: usize,
    features: Vec<f32>,
    rewards: Vec<f32>,
}

impl CandidateBatch {
    /// Densifies every candidate with `hasher` and computes its reward under `policy`.
    pub fn assemble(hasher: &FeatureHasher, candidates: &[Candidate], policy: RewardPolicy) -> Self {
        let dim = hasher.dim();
        let mut features = Vec::with_capacity(candidates.len() * dim);
        let mut rewards = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            features.extend(hasher.densify(&candidate.features));
            rewards.push(policy.reward(candidate.compatibility));
        }

        Self {
            dim,
            features,
            rewards,
        }
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn features(&self) -> &[f32] {
        &self.features
    }

    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    /// Views the features as a `len × dim` matrix.
    pub fn view(&self) -> Result<ArrayView2<'_, f32>> {
        ArrayView2::from_shape((self.len(), self.dim), &self.features).map_err(|_| {
            ScorerErr::InvalidDimension {
                what: "candidate features",
                got: self.features.len(),
                expected: self.len() * self.dim,
            }
        })
    }
}

/// Orders candidate indices by descending score, ties keep their original order.
pub fn ranking(scores: ArrayView1<f32>) -> Vec<(usize, f32)> {
    let mut ranked: Vec<_> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranked
}

#[cfg(test)]
mod tests {
    use ndarray::arr1;

    use super::*;

    #[test]
    fn all_or_nothing_only_rewards_exact_matches() {
        let policy = RewardPolicy::AllOrNothing;

        assert_eq!(policy.reward(1.), 1.);
        assert_eq!(policy.reward(0.99), 0.);
        assert_eq!(RewardPolicy::Partial.reward(0.2), 0.2);
    }

    #[test]
    fn assemble_is_candidate_major() {
        let hasher = FeatureHasher::new(4).unwrap();
        let candidates = [
            Candidate::new([("a", 1.)], 0.2),
            Candidate::new([("b", 2.)], 1.),
        ];

        let batch = CandidateBatch::assemble(&hasher, &candidates, RewardPolicy::Partial);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.features().len(), 8);
        assert_eq!(batch.features()[hasher.bucket("a")], 1.);
        assert_eq!(batch.features()[4 + hasher.bucket("b")], 2.);
        assert_eq!(batch.rewards(), &[0.2, 1.]);

        let view = batch.view().unwrap();
        assert_eq!(view.dim(), (2, 4));
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let ranked = ranking(arr1(&[0.5, 2., 0.5, -1.]).view());
        let order: Vec<_> = ranked.iter().map(|(i, _)| *i).collect();

        assert_eq!(order, vec![1, 0, 2, 3]);
    }
}
