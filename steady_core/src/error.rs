use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SteadyError {
    #[error("sensor error: {0}")]
    Sensor(String),
    #[error("display error: {0}")]
    Display(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing tolerance")]
    MissingTolerance,
    #[error("tolerance must be >= 0")]
    NegativeTolerance,
    #[error("valid range is inverted (min > max)")]
    InvertedRange,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
