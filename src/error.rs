use thiserror::Error;

/// Failures surfaced by the position registry. The aggregation math itself is
/// total over its inputs and needs no error type.
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("failed to read positions file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse positions file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate position id '{0}'")]
    DuplicatePosition(String),
}
