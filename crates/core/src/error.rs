use thiserror::Error;

/// Top-level error type used across the entire workspace.
#[derive(Debug, Error)]
pub enum MeterError {
    #[error("config error: {0}")]
    Config(String),

    #[error("system error: {0}")]
    System(String),

    /// A data point was pushed to a series that was never registered.
    #[error("unknown series '{0}'")]
    UnknownSeries(String),

    #[error("series '{0}' is already registered")]
    DuplicateSeries(String),

    /// The indicator was destroyed; it accepts no further operations.
    #[error("indicator '{0}' has been destroyed")]
    Destroyed(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = MeterError> = std::result::Result<T, E>;
