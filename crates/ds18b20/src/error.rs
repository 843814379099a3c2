//! Error types for DS18B20 reads.

use thiserror::Error;

/// Coarse classification of a [`Ds18b20Error`].
///
/// `Configuration` is permanent and never retried. `Io` and `SensorRead`
/// are what a retry budget is spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Io,
    SensorRead,
}

#[derive(Error, Debug)]
pub enum Ds18b20Error {
    #[error("No key provided")]
    EmptyKey,

    #[error("Fail check: retry_on_error >= 0 (got {0})")]
    NegativeRetry(i64),

    #[error("No reader provided")]
    MissingReader,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read sensor temperature")]
    ReadSensor,
}

impl Ds18b20Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Ds18b20Error::EmptyKey
            | Ds18b20Error::NegativeRetry(_)
            | Ds18b20Error::MissingReader => ErrorKind::Configuration,
            Ds18b20Error::Io(_) => ErrorKind::Io,
            Ds18b20Error::ReadSensor => ErrorKind::SensorRead,
        }
    }

    /// Stable numeric code, used as the process exit status by `ds18b20ctl`.
    pub fn code(&self) -> i32 {
        match self {
            Ds18b20Error::EmptyKey => 64,
            Ds18b20Error::NegativeRetry(_) => 65,
            Ds18b20Error::MissingReader => 66,
            Ds18b20Error::Io(_) => 74,
            Ds18b20Error::ReadSensor => 75,
        }
    }

    /// Whether another attempt could succeed; configuration errors never do.
    pub fn is_transient(&self) -> bool {
        self.kind() != ErrorKind::Configuration
    }
}

pub type Result<T> = std::result::Result<T, Ds18b20Error>;
