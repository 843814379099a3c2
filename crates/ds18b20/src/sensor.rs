//! DS18B20 sensor handle with bounded retry.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Ds18b20Error, Result};
use crate::parse::extract;
use crate::reader::{FileReader, RawReader};

/// One physical thermometer, addressed by its one-wire id (e.g. `28-000005e2fdc3`).
#[derive(Clone)]
pub struct Sensor {
    key: String,
    /// Extra attempts after the first failure; 0 means no retry.
    retry_count: u64,
    reader: Arc<dyn RawReader>,
}

impl Sensor {
    /// Sensor backed by sysfs, without retry.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        Self::with_retry(key, 0)
    }

    /// Sensor backed by sysfs, retried up to `retry_on_error` extra times.
    pub fn with_retry(key: impl Into<String>, retry_on_error: i64) -> Result<Self> {
        Self::with_reader(key, retry_on_error, Some(Arc::new(FileReader::new())))
    }

    /// Sensor backed by an arbitrary raw data source.
    pub fn with_reader(
        key: impl Into<String>,
        retry_on_error: i64,
        reader: Option<Arc<dyn RawReader>>,
    ) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Ds18b20Error::EmptyKey);
        }
        if retry_on_error < 0 {
            return Err(Ds18b20Error::NegativeRetry(retry_on_error));
        }
        let retry_count = retry_on_error as u64;
        let reader = reader.ok_or(Ds18b20Error::MissingReader)?;

        Ok(Self {
            key,
            retry_count,
            reader,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn retry_count(&self) -> u64 {
        self.retry_count
    }

    /// Read the temperature in degrees Celsius.
    ///
    /// Makes at most `retry_count + 1` fetches and returns the last error
    /// unchanged once the budget is spent.
    pub fn temperature(&self) -> Result<f64> {
        let mut result = self.read();
        let mut attempt = 0;
        while attempt < self.retry_count {
            let Err(err) = &result else { break };
            attempt += 1;
            warn!(
                sensor = %self.key,
                "read failed ({}), retry {}/{}",
                err,
                attempt,
                self.retry_count
            );
            result = self.read();
        }
        result
    }

    fn read(&self) -> Result<f64> {
        debug!(sensor = %self.key, "reading raw data");
        let raw = self.reader.get(&self.key)?;
        extract(&raw)
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("key", &self.key)
            .field("retry_count", &self.retry_count)
            .finish_non_exhaustive()
    }
}
