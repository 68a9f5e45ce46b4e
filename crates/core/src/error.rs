/// Errors raised by the metrics engine.
///
/// Only caller-input problems are errors. Not having enough history is
/// reported as `None` by the individual calculators instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
