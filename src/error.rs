use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("candle series is empty")]
    EmptySeries,

    #[error("failed to parse `{field}`: {reason}")]
    Parse { field: &'static str, reason: String },

    #[error("fetch failed: {0}")]
    Fetch(String),
}
