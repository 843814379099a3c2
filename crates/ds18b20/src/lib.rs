//! Temperature readings from DS18B20 one-wire thermometers.
//!
//! Devices are read through the Linux `w1_therm` sysfs interface. Parsing and
//! retry live in [`Sensor`]; the file access sits behind [`RawReader`] so it
//! can be swapped out.

pub mod config;
pub mod discovery;
pub mod error;
pub mod parse;
pub mod reader;
pub mod sensor;

pub use config::Ds18b20Config;
pub use discovery::{sensor_ids, Discovery};
pub use error::{Ds18b20Error, ErrorKind, Result};
pub use parse::extract;
pub use reader::{FileReader, RawReader};
pub use sensor::Sensor;
