mod adagrad;
mod any;
mod gradient_descent;
mod optimizer;

pub use adagrad::Adagrad;
pub use any::AnyOptimizer;
pub use gradient_descent::GradientDescent;
pub use optimizer::Optimizer;
