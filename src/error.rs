use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::initialization::RandErr;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, ScorerErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum ScorerErr {
    InvalidDimension {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    UninitializedModel,
    AlreadyInitialized,
    NumericDegenerate {
        what: &'static str,
    },
    Rand(RandErr),
    Config(String),
    Dataset(String),
    Io(io::Error),
}

impl Display for ScorerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerErr::InvalidDimension {
                what,
                got,
                expected,
            } => write!(
                f,
                "invalid dimension for {what}, got {got} and expected {expected}"
            ),
            ScorerErr::UninitializedModel => {
                f.write_str("the model was used before being initialized")
            }
            ScorerErr::AlreadyInitialized => f.write_str("the model is already initialized"),
            ScorerErr::NumericDegenerate { what } => {
                write!(f, "found a non finite value in {what}")
            }
            ScorerErr::Rand(e) => write!(f, "failed to build parameter generator: {e}"),
            ScorerErr::Config(e) => write!(f, "invalid configuration: {e}"),
            ScorerErr::Dataset(e) => write!(f, "invalid dataset: {e}"),
            ScorerErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for ScorerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScorerErr::Rand(e) => Some(e),
            ScorerErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RandErr> for ScorerErr {
    fn from(value: RandErr) -> Self {
        Self::Rand(value)
    }
}

impl From<io::Error> for ScorerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ScorerErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

/// Checks that a buffer has the length the computation expects.
///
/// # Arguments
/// * `what` - The name of the checked buffer, used in the error message.
/// * `got` - The actual length.
/// * `expected` - The required length.
///
/// # Returns
/// An `InvalidDimension` error if the lengths differ.
pub(crate) fn check_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(ScorerErr::InvalidDimension {
            what,
            got,
            expected,
        });
    }

    Ok(())
}

/// Checks that every value in `values` is finite.
///
/// # Returns
/// A `NumericDegenerate` error naming `what` if a NaN or an infinity is found.
pub(crate) fn check_finite<'a, I>(what: &'static str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a f32>,
{
    if values.into_iter().all(|v| v.is_finite()) {
        return Ok(());
    }

    Err(ScorerErr::NumericDegenerate { what })
}
