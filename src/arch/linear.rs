use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{Result, error::check_len};

/// A bias-free linear projection of a batch onto a single weight row.
///
/// The batch `x` holds one candidate per row, so `x` has shape `m × n` and the weight row has
/// length `n`.
#[derive(Debug, Clone, Copy)]
pub struct Linear {
    dim: usize,
}

impl Linear {
    /// Returns a new `Linear` over `dim` features.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// The inner product of a single feature vector with the weights.
    ///
    /// # Returns
    /// An `InvalidDimension` error if `x` or `w` don't have `dim` values.
    pub fn dot(&self, w: ArrayView1<f32>, x: ArrayView1<f32>) -> Result<f32> {
        check_len("weights", w.len(), self.dim)?;
        check_len("features", x.len(), self.dim)?;

        Ok(w.dot(&x))
    }

    /// Computes one logit per row of `x`.
    ///
    /// # Returns
    /// An `InvalidDimension` error if the batch or the weights don't have `dim` columns.
    pub fn forward(&self, w: ArrayView1<f32>, x: ArrayView2<f32>) -> Result<Array1<f32>> {
        check_len("weights", w.len(), self.dim)?;
        check_len("features", x.ncols(), self.dim)?;

        Ok(x.dot(&w))
    }

    /// Contracts the batch with the logit gradient, giving the gradient of the loss with
    /// respect to the weights: `dw[i] = Σⱼ d[j]·x[j][i]`.
    pub fn backward(&self, x: ArrayView2<f32>, d: ArrayView1<f32>) -> Result<Array1<f32>> {
        check_len("features", x.ncols(), self.dim)?;
        check_len("logit gradient", d.len(), x.nrows())?;

        Ok(x.t().dot(&d))
    }
}
