use crate::{Result, error::check_len};

/// Source of the values a scorer's weight row starts from.
///
/// Generators may be unbounded, like `ConstParamGen` and `RandParamGen`, or run dry after a
/// number of values, in which case `sample` returns `None`.
pub trait ParamGen {
    /// Returns at most `n` values, `None` once nothing is left.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;

    /// Draws exactly `n` values, asking `sample` as many times as needed.
    ///
    /// # Returns
    /// An `InvalidDimension` error if the generator runs dry before `n` values.
    fn fill(&mut self, n: usize) -> Result<Box<[f32]>> {
        let mut values = Vec::with_capacity(n);

        while values.len() < n {
            match self.sample(n - values.len()) {
                Some(chunk) if !chunk.is_empty() => values.extend(chunk),
                _ => break,
            }
        }

        check_len("initial weights", values.len(), n)?;
        Ok(values.into_boxed_slice())
    }
}

impl<P: ParamGen + ?Sized> ParamGen for Box<P> {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        (**self).sample(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScorerErr;

    /// Hands out one value per call until `0` runs out.
    #[derive(Debug)]
    struct Trickle(usize);

    impl ParamGen for Trickle {
        fn sample(&mut self, _n: usize) -> Option<Vec<f32>> {
            (self.0 > 0).then(|| {
                self.0 -= 1;
                vec![1.]
            })
        }
    }

    #[test]
    fn fill_gathers_partial_samples() {
        let values = Trickle(5).fill(3).unwrap();
        assert_eq!(&*values, &[1., 1., 1.]);
    }

    #[test]
    fn fill_reports_a_dry_generator() {
        let err = Trickle(2).fill(4).unwrap_err();
        assert!(matches!(
            err,
            ScorerErr::InvalidDimension {
                got: 2,
                expected: 4,
                ..
            }
        ));
    }

    #[test]
    fn boxed_generators_fill_too() {
        let mut param_gen: Box<dyn ParamGen> = Box::new(Trickle(1));
        assert_eq!(&*param_gen.fill(1).unwrap(), &[1.]);
        assert!(param_gen.sample(1).is_none());
    }
}
