//! Expression tracking over an external classifier.
//!
//! The classifier model itself is a collaborator behind a trait; this
//! producer owns the running histogram and the latest dominant
//! expression, falling back to neutral when the classifier fails.

use crate::capture::Frame;
use crate::signals::{empty_expression_counts, Expression, ExpressionCounts, SignalError};

/// Expression classification collaborator.
pub trait ExpressionClassifier: Send {
    /// Classify the dominant expression in a frame. `Ok(None)` means the
    /// classifier had nothing to report for this frame.
    fn classify(&mut self, frame: &Frame) -> Result<Option<Expression>, SignalError>;
}

/// A classifier that never reports an expression.
///
/// Used when no model is wired in, so the pipeline runs with a neutral
/// expression throughout.
pub struct NoopClassifier;

impl ExpressionClassifier for NoopClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Option<Expression>, SignalError> {
        Ok(None)
    }
}

/// A classifier that always reports the same expression.
pub struct FixedClassifier(pub Expression);

impl ExpressionClassifier for FixedClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Option<Expression>, SignalError> {
        Ok(Some(self.0))
    }
}

/// Stateful expression tracker.
pub struct ExpressionSignal {
    last: Expression,
    counts: ExpressionCounts,
}

impl ExpressionSignal {
    pub fn new() -> Self {
        Self {
            last: Expression::Neutral,
            counts: empty_expression_counts(),
        }
    }

    /// Run the classifier on a frame and update the histogram.
    ///
    /// Returns the latest dominant expression and a copy of the running
    /// histogram. Classifier failures are absorbed here: the expression
    /// falls back to neutral and the histogram is left untouched.
    pub fn analyze(
        &mut self,
        classifier: &mut dyn ExpressionClassifier,
        frame: &Frame,
    ) -> (Expression, ExpressionCounts) {
        match classifier.classify(frame) {
            Ok(Some(expression)) => {
                *self.counts.entry(expression).or_insert(0) += 1;
                self.last = expression;
            }
            Ok(None) => {}
            Err(e) => {
                log::debug!("expression classifier failed: {e}");
                self.last = Expression::Neutral;
            }
        }
        (self.last, self.counts.clone())
    }
}

impl Default for ExpressionSignal {
    fn default() -> Self {
        Self::new()
    }
}
