use thiserror::Error;

/// Failures of a single report call.
///
/// `ClientUnavailable` and `MissingTarget` are detected locally before any
/// network traffic. `Provider` wraps whatever the provider client returned.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("analytics client unavailable")]
    ClientUnavailable,

    #[error("analytics property id is not configured")]
    MissingTarget,

    #[error("provider error: {0}")]
    Provider(#[from] anyhow::Error),

    #[error("row {row}: expected {expected} {kind} values, got {actual}")]
    ShapeMismatch {
        row: usize,
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}
