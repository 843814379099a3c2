//! Command implementations for ds18b20ctl.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ds18b20::{Ds18b20Config, Ds18b20Error, RawReader, Sensor};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

/// One line of `read --json` output.
#[derive(Debug, Serialize)]
pub struct ReadingRecord {
    pub sensor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celsius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub fn load_config(path: Option<&Path>, root: Option<PathBuf>) -> Result<Ds18b20Config> {
    let mut config = match path {
        Some(path) => Ds18b20Config::load_from_path(path)?,
        None => Ds18b20Config::load()?,
    };
    if let Some(root) = root {
        config.devices_root = root;
    }
    debug!(root = %config.devices_root.display(), master = %config.master, "configuration loaded");
    Ok(config)
}

pub fn list(config: &Ds18b20Config, masters: bool) -> Result<ExitCode> {
    let discovery = config.discovery();
    if masters {
        let names = discovery.bus_masters().with_context(|| {
            format!("Failed to list bus masters under {}", discovery.root().display())
        })?;
        for name in names {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let ids = discovery.sensor_ids().with_context(|| {
        format!(
            "Failed to list sensors on {} under {}",
            discovery.master(),
            discovery.root().display()
        )
    })?;
    for id in ids {
        println!("{}", id);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn read(
    config: &Ds18b20Config,
    names: &[String],
    retry: Option<i64>,
    json: bool,
) -> Result<ExitCode> {
    let names: Vec<String> = if names.is_empty() {
        config
            .discovery()
            .sensor_ids()
            .context("No sensors given and discovery failed")?
    } else {
        names.to_vec()
    };

    let retry = retry.unwrap_or_else(|| i64::from(config.retry));
    if retry < 0 {
        return Err(Ds18b20Error::NegativeRetry(retry)).context("Invalid --retry");
    }
    let reader: Arc<dyn RawReader> = Arc::new(config.reader());

    let mut last_error: Option<Ds18b20Error> = None;
    for name in &names {
        let id = config.resolve(name);
        let alias = (id != name.as_str()).then(|| name.clone());
        let result = Sensor::with_reader(id, retry, Some(Arc::clone(&reader)))
            .and_then(|sensor| sensor.temperature());
        let record = ReadingRecord {
            sensor: id.to_string(),
            alias,
            celsius: result.as_ref().ok().copied(),
            error: result.as_ref().err().map(|e| e.to_string()),
            timestamp: Utc::now(),
        };

        if json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", format_record(&record));
        }

        if let Err(e) = result {
            debug!(sensor = %id, "read failed: {}", e);
            last_error = Some(e);
        }
    }

    Ok(match last_error {
        None => ExitCode::SUCCESS,
        Some(e) => ExitCode::from(exit_status(&e)),
    })
}

pub fn show_config(config: &Ds18b20Config) -> Result<ExitCode> {
    print!("{}", config.to_toml()?);
    Ok(ExitCode::SUCCESS)
}

fn format_record(record: &ReadingRecord) -> String {
    let sensor = if record.sensor.is_empty() {
        "''"
    } else {
        record.sensor.as_str()
    };
    let label = match &record.alias {
        Some(alias) => format!("{} ({})", sensor, alias),
        None => sensor.to_string(),
    };
    match (record.celsius, &record.error) {
        (Some(c), _) => format!("{}  {:.3} °C", label, c),
        (None, Some(e)) => format!("{}  error: {}", label, e),
        (None, None) => format!("{}  no reading", label),
    }
}

/// Exit status for the last failed read; transient failures keep their own code.
fn exit_status(err: &Ds18b20Error) -> u8 {
    if !err.is_transient() {
        return 1;
    }
    u8::try_from(err.code()).unwrap_or(1)
}
