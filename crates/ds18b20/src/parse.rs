//! Parsing of `w1_slave` content.
//!
//! ```text
//! 58 01 55 00 7f ff 0c 10 ff : crc=ff YES
//! 58 01 55 00 7f ff 0c 10 ff t=21500
//! ```
//!
//! Only the value after the last `t=` is used. The CRC verdict on the first
//! line is ignored.

use tracing::debug;

use crate::error::{Ds18b20Error, Result};

const TEMP_MARKER: &str = "t=";

/// Power-on reset value of the scratchpad. The device reports it when a
/// conversion never happened (e.g. power dropped mid-conversion).
pub const POWER_ON_SENTINEL: &str = "85000";

/// Extract the temperature in degrees Celsius from raw `w1_slave` text.
pub fn extract(raw: &str) -> Result<f64> {
    let Some(idx) = raw.rfind(TEMP_MARKER) else {
        debug!("no '{}' marker in raw reading", TEMP_MARKER);
        return Err(Ds18b20Error::ReadSensor);
    };

    // Each block ends with a terminator character that is not part of the value.
    let start = idx + TEMP_MARKER.len();
    let end = raw.char_indices().last().map(|(i, _)| i).unwrap_or(0);
    if end < start {
        debug!("empty value after '{}' marker", TEMP_MARKER);
        return Err(Ds18b20Error::ReadSensor);
    }

    let value = raw[start..end].trim();
    if value == POWER_ON_SENTINEL {
        debug!("sensor reported power-on value {}", POWER_ON_SENTINEL);
        return Err(Ds18b20Error::ReadSensor);
    }

    let millis: f64 = value.parse().map_err(|_| {
        debug!("unparseable temperature value {:?}", value);
        Ds18b20Error::ReadSensor
    })?;
    if !millis.is_finite() {
        debug!("non-finite temperature value {:?}", value);
        return Err(Ds18b20Error::ReadSensor);
    }

    Ok(millis / 1000.0)
}
