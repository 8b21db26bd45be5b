use thiserror::Error;

use crate::core::SeriesId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown series: {0}")]
    UnknownSeries(SeriesId),

    #[error("series {0} has been disposed")]
    SeriesDisposed(SeriesId),
}
