use thiserror::Error;

/// Errors raised by the dashboard pipeline itself, as opposed to the warehouse driver
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("malformed filter option data: {0}")]
    MalformedOptions(String),

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),
}
