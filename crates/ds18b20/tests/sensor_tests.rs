//! Tests for sensor reads against a fake sysfs tree.

use ds18b20::*;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

const CORRECT: &str =
    "58 01 55 00 7f ff 0c 10 ff : crc=ff YES\n58 01 55 00 7f ff 0c 10 ff t=21500\n";

fn add_device(root: &Path, id: &str, raw: &str) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("w1_slave"), raw).unwrap();
}

fn file_sensor(root: &Path, id: &str, retry: i64) -> Sensor {
    let reader: Arc<dyn RawReader> = Arc::new(FileReader::with_root(root));
    Sensor::with_reader(id, retry, Some(reader)).unwrap()
}

/// Fails a fixed number of times before returning a good reading.
struct FlakyReader {
    failures: usize,
    calls: AtomicUsize,
}

impl RawReader for FlakyReader {
    fn get(&self, _key: &str) -> io::Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(io::Error::new(io::ErrorKind::NotFound, "w1_slave vanished"))
        } else {
            Ok(CORRECT.to_string())
        }
    }
}

#[test]
fn test_reads_device_file() {
    let dir = tempdir().unwrap();
    add_device(dir.path(), "28-000005e2fdc3", CORRECT);
    let sensor = file_sensor(dir.path(), "28-000005e2fdc3", 0);
    assert_eq!(sensor.temperature().unwrap(), 21.5);
}

#[test]
fn test_missing_device_is_io_error() {
    let dir = tempdir().unwrap();
    let sensor = file_sensor(dir.path(), "28-typo", 3);
    let err = sensor.temperature().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err, Ds18b20Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
}

#[test]
fn test_sentinel_on_disk_is_sensor_read_error() {
    let dir = tempdir().unwrap();
    add_device(dir.path(), "28-aaa", "00 00 : crc=00 YES\n00 00 t=85000\n");
    let err = file_sensor(dir.path(), "28-aaa", 1).temperature().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SensorRead);
}

#[test]
fn test_retry_budget_counts_extra_attempts() {
    for n in 0..5usize {
        let reader = Arc::new(FlakyReader {
            failures: n,
            calls: AtomicUsize::new(0),
        });
        let dyn_reader: Arc<dyn RawReader> = reader.clone();
        let sensor = Sensor::with_reader("28-flaky", n as i64, Some(dyn_reader)).unwrap();
        assert_eq!(sensor.temperature().unwrap(), 21.5);
        assert_eq!(reader.calls.load(Ordering::SeqCst), n + 1);
    }
}

#[test]
fn test_budget_exhausted_before_success() {
    let reader = Arc::new(FlakyReader {
        failures: 2,
        calls: AtomicUsize::new(0),
    });
    let dyn_reader: Arc<dyn RawReader> = reader.clone();
    let sensor = Sensor::with_reader("28-flaky", 1, Some(dyn_reader)).unwrap();
    assert!(sensor.temperature().is_err());
    assert_eq!(reader.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_shared_sensor_across_threads() {
    let dir = tempdir().unwrap();
    add_device(dir.path(), "28-shared", CORRECT);
    let sensor = Arc::new(file_sensor(dir.path(), "28-shared", 0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sensor = Arc::clone(&sensor);
            thread::spawn(move || sensor.temperature().unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 21.5);
    }
}

#[test]
fn test_discovery_and_config_end_to_end() {
    let dir = tempdir().unwrap();
    let master = dir.path().join("w1_bus_master1");
    fs::create_dir_all(&master).unwrap();
    fs::write(master.join("w1_master_slaves"), "28-aaa\n28-bbb\n").unwrap();
    add_device(dir.path(), "28-aaa", CORRECT);
    add_device(dir.path(), "28-bbb", "xx : crc=01 YES\nxx t=-1062\n");

    let mut config = Ds18b20Config::default();
    config.devices_root = dir.path().to_path_buf();

    let ids = config.discovery().sensor_ids().unwrap();
    assert_eq!(ids, vec!["28-aaa", "28-bbb"]);

    let temps: Vec<f64> = ids
        .iter()
        .map(|id| config.sensor(id).unwrap().temperature().unwrap())
        .collect();
    assert_eq!(temps, vec![21.5, -1.062]);
}
