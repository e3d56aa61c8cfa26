use super::ParamGen;

/// Starts every weight at the same value, zero being the scorer's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstParamGen(f32);

impl ConstParamGen {
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn zeros() -> Self {
        Self::default()
    }
}

impl ParamGen for ConstParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        Some(vec![self.0; n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_any_length() {
        let weights = ConstParamGen::new(0.5).fill(3).unwrap();
        assert_eq!(&*weights, &[0.5; 3]);

        let weights = ConstParamGen::zeros().fill(1000).unwrap();
        assert!(weights.iter().all(|w| *w == 0.));
    }
}
