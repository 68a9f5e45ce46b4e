/// Errors raised while loading input or configuration for a report.
///
/// Per-metric calculation failures do not surface here; the dashboard
/// records them on the affected card instead.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience type alias for report results.
pub type ReportResult<T> = Result<T, ReportError>;
