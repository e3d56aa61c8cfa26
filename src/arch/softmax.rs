use ndarray::{Array1, ArrayView1, Zip};

/// Normalizes `logits` into a probability distribution over the batch.
///
/// The maximum logit is subtracted before exponentiating so that large logits can't overflow
/// to infinity. An empty input gives an empty output.
pub fn forward(logits: ArrayView1<f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |acc, &z| acc.max(z));
    let mut probs = logits.mapv(|z| (z - max).exp());
    let total = probs.sum();
    probs.mapv_inplace(|p| p / total);
    probs
}

/// Pulls the gradient `d_probs` back through the softmax.
///
/// This is the product of the softmax Jacobian with `d_probs`:
/// `d_logits[j] = probs[j]·(d_probs[j] - Σₖ probs[k]·d_probs[k])`.
pub fn backward(probs: ArrayView1<f32>, d_probs: ArrayView1<f32>) -> Array1<f32> {
    let expected = probs.dot(&d_probs);

    Zip::from(&probs)
        .and(&d_probs)
        .map_collect(|&p, &g| p * (g - expected))
}
