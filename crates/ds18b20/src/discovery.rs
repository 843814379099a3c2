//! Enumeration of thermometers attached to a one-wire bus master.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::reader::W1_DEVICES_PATH;

pub const DEFAULT_MASTER: &str = "w1_bus_master1";

const MASTER_PREFIX: &str = "w1_bus_master";
const SLAVES_FILE: &str = "w1_master_slaves";

/// Printed by the kernel in place of ids when a master sees no slaves.
const NO_SLAVES: &str = "not found.";

/// Get all sensor ids connected to the default bus master.
pub fn sensor_ids() -> io::Result<Vec<String>> {
    Discovery::default().sensor_ids()
}

/// Looks up bus masters and their slaves under a devices root.
#[derive(Debug, Clone)]
pub struct Discovery {
    root: PathBuf,
    master: String,
}

impl Discovery {
    pub fn new(root: impl Into<PathBuf>, master: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            master: master.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn master(&self) -> &str {
        &self.master
    }

    /// Ids listed in `<root>/<master>/w1_master_slaves`, in file order.
    pub fn sensor_ids(&self) -> io::Result<Vec<String>> {
        let path = self.root.join(&self.master).join(SLAVES_FILE);
        let data = fs::read_to_string(&path)?;
        let ids = parse_slaves(&data);
        debug!(master = %self.master, count = ids.len(), "enumerated slaves");
        Ok(ids)
    }

    /// Names of every `w1_bus_master*` entry under the root, sorted.
    pub fn bus_masters(&self) -> io::Result<Vec<String>> {
        let mut masters: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(MASTER_PREFIX))
            .collect();
        masters.sort();
        Ok(masters)
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new(W1_DEVICES_PATH, DEFAULT_MASTER)
    }
}

/// Split a slave listing into ids. Blank lines, including the one after the
/// final newline, are not ids.
fn parse_slaves(data: &str) -> Vec<String> {
    data.split('\n')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| *id != NO_SLAVES)
        .map(str::to_string)
        .collect()
}
