use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::uniform::Error as UniformError;

/// The initial weights distribution couldn't be built.
#[derive(Debug, Clone, PartialEq)]
pub enum RandErr {
    /// The uniform bounds are reversed, equal, or not finite.
    Range(UniformError),
    /// The normal spread is negative or not finite.
    StdDev(f32),
}

impl From<UniformError> for RandErr {
    fn from(value: UniformError) -> Self {
        Self::Range(value)
    }
}

impl Display for RandErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandErr::Range(e) => write!(f, "invalid uniform range: {e}"),
            RandErr::StdDev(std_dev) => write!(f, "invalid standard deviation {std_dev}"),
        }
    }
}

impl Error for RandErr {}
