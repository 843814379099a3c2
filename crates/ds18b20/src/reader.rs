//! Raw data sources for sensor readings.
//!
//! The kernel `w1_therm` driver exposes every probed thermometer as
//! `/sys/bus/w1/devices/<id>/w1_slave`. Reading that file triggers a
//! conversion and yields two lines of text; this module only fetches it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default location of one-wire device nodes.
pub const W1_DEVICES_PATH: &str = "/sys/bus/w1/devices";

/// Per-device file carrying the scratchpad dump and `t=` value.
pub const W1_SLAVE_FILE: &str = "w1_slave";

/// Something that can hand back the raw text for a sensor key.
pub trait RawReader: Send + Sync {
    fn get(&self, key: &str) -> io::Result<String>;
}

/// Reads `<root>/<key>/w1_slave` from the filesystem.
#[derive(Debug, Clone)]
pub struct FileReader {
    root: PathBuf,
}

impl FileReader {
    pub fn new() -> Self {
        Self::with_root(W1_DEVICES_PATH)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slave_path(&self, key: &str) -> PathBuf {
        self.root.join(key).join(W1_SLAVE_FILE)
    }
}

impl Default for FileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RawReader for FileReader {
    fn get(&self, key: &str) -> io::Result<String> {
        fs::read_to_string(self.slave_path(key))
    }
}
