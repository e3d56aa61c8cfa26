use log::{Level, debug, info, log_enabled};
use ndarray::Array1;

/// What a single policy-gradient step computed.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub loss: f32,
    pub logits: Array1<f32>,
    pub probs: Array1<f32>,
}

impl StepReport {
    /// The report of a step over an empty batch.
    pub fn empty() -> Self {
        Self {
            loss: 0.,
            logits: Array1::zeros(0),
            probs: Array1::zeros(0),
        }
    }

    /// Returns the batch size of the step.
    pub fn len(&self) -> usize {
        self.logits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logits.is_empty()
    }
}

/// A hook called after every successful training step.
///
/// Keeps diagnostics out of the numeric code.
pub trait StepObserver {
    fn on_step(&mut self, report: &StepReport);
}

/// Ignores every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _report: &StepReport) {}
}

/// Writes every step to the `log` facade.
///
/// The logits go to `debug` unless `verbose` is set, in which case they are logged at `info`
/// next to the loss.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver {
    verbose: bool,
}

impl LogObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl StepObserver for LogObserver {
    fn on_step(&mut self, report: &StepReport) {
        if self.verbose {
            info!("logits: {}", report.logits);
            info!("example loss={:.6} batch={}", report.loss, report.len());
            return;
        }

        if log_enabled!(Level::Debug) {
            debug!("logits: {}", report.logits);
        }
        debug!("example loss={:.6} batch={}", report.loss, report.len());
    }
}

impl<F: FnMut(&StepReport)> StepObserver for F {
    fn on_step(&mut self, report: &StepReport) {
        self(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        let mut observer = |report: &StepReport| seen.push(report.loss);

        observer.on_step(&StepReport::empty());
        observer.on_step(&StepReport {
            loss: -0.5,
            ..StepReport::empty()
        });

        assert_eq!(seen, vec![0., -0.5]);
    }
}
