use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::{ParamGen, RandErr};

/// Draws the initial weights from a distribution with an owned, possibly seeded, rng.
pub struct RandParamGen<R: Rng, D: Distribution<f32>> {
    rng: R,
    distribution: D,
}

impl<R: Rng, D: Distribution<f32>> RandParamGen<R, D> {
    pub fn new(rng: R, distribution: D) -> Self {
        Self { rng, distribution }
    }
}

impl<R: Rng> RandParamGen<R, Uniform<f32>> {
    /// Uniform weights over `[low, high)`.
    ///
    /// # Returns
    /// A `RandErr::Range` error if the range is empty or not finite.
    pub fn uniform(rng: R, low: f32, high: f32) -> Result<Self, RandErr> {
        Ok(Self::new(rng, Uniform::new(low, high)?))
    }

    /// Uniform weights over `[low, high]`.
    pub fn uniform_inclusive(rng: R, low: f32, high: f32) -> Result<Self, RandErr> {
        Ok(Self::new(rng, Uniform::new_inclusive(low, high)?))
    }

    /// Xavier uniform weights for a `fan_in × fan_out` block, a scoring row being
    /// `fan_in = dim` and `fan_out = 1`.
    pub fn xavier_uniform(rng: R, fan_in: usize, fan_out: usize) -> Result<Self, RandErr> {
        let range = (6. / (fan_in + fan_out) as f32).sqrt();
        Self::uniform(rng, -range, range)
    }
}

impl<R: Rng> RandParamGen<R, Normal<f32>> {
    /// Normally distributed weights.
    ///
    /// # Returns
    /// A `RandErr::StdDev` error if `std_dev` is negative or not finite.
    pub fn normal(rng: R, mean: f32, std_dev: f32) -> Result<Self, RandErr> {
        // `Normal::new` accepts a negative spread and mirrors the samples.
        if std_dev < 0. {
            return Err(RandErr::StdDev(std_dev));
        }

        let normal = Normal::new(mean, std_dev).map_err(|_| RandErr::StdDev(std_dev))?;
        Ok(Self::new(rng, normal))
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<R, D> {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        Some(
            (&self.distribution)
                .sample_iter(&mut self.rng)
                .take(n)
                .collect(),
        )
    }
}
