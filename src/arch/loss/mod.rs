mod loss_fn;
mod reward_weighted;

pub use loss_fn::LossFn;
pub use reward_weighted::RewardWeighted;
