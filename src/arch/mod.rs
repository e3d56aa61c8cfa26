//! The fixed forward/backward pieces of the scoring computation:
//! `logits = X·w`, `probs = softmax(logits)`, `loss = -Σ probs ⊙ rewards`.

mod linear;
pub mod loss;
pub mod softmax;

pub use linear::Linear;
