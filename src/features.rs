use std::{
    hash::{DefaultHasher, Hash, Hasher},
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{Result, ScorerErr};

/// Folds named sparse features into a dense vector of fixed length.
///
/// Each name lands on bucket `hash(name) % dim`. When two names of the same vector share a
/// bucket the later one wins and a collision is counted.
#[derive(Debug)]
pub struct FeatureHasher {
    dim: usize,
    collisions: AtomicUsize,
    non_collisions: AtomicUsize,
}

impl FeatureHasher {
    /// Creates a new `FeatureHasher`.
    ///
    /// # Returns
    /// An `InvalidDimension` error if `dim` is zero.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(ScorerErr::InvalidDimension {
                what: "hashed features",
                got: 0,
                expected: 1,
            });
        }

        Ok(Self {
            dim,
            collisions: AtomicUsize::new(0),
            non_collisions: AtomicUsize::new(0),
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the bucket `name` is hashed to.
    pub fn bucket(&self, name: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        (hasher.finish() % self.dim as u64) as usize
    }

    /// Densifies `features` into a vector of length `dim`.
    pub fn densify<'a, I, K>(&self, features: I) -> Vec<f32>
    where
        I: IntoIterator<Item = (K, &'a f32)>,
        K: AsRef<str>,
    {
        let mut dense = vec![0.; self.dim];
        let mut taken = vec![false; self.dim];

        for (name, &value) in features {
            let idx = self.bucket(name.as_ref());

            let counter = if taken[idx] {
                &self.collisions
            } else {
                &self.non_collisions
            };
            counter.fetch_add(1, Ordering::Relaxed);

            taken[idx] = true;
            dense[idx] = value;
        }

        dense
    }

    pub fn collisions(&self) -> usize {
        self.collisions.load(Ordering::Relaxed)
    }

    pub fn non_collisions(&self) -> usize {
        self.non_collisions.load(Ordering::Relaxed)
    }

    /// Fraction of hashed features that landed on an already used bucket, `0.0` if nothing
    /// was hashed yet.
    pub fn collision_ratio(&self) -> f64 {
        let collisions = self.collisions();
        let total = collisions + self.non_collisions();

        if total == 0 {
            return 0.;
        }

        collisions as f64 / total as f64
    }
}
