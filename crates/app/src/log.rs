use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub const CAPACITY: usize = 100;

static LOG: Mutex<Option<Arc<dyn Repository>>> = Mutex::new(None);

pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Keeps the latest [`CAPACITY`] entries.
#[derive(Default)]
pub struct RingBuffer {
    entries: Mutex<VecDeque<Entry>>,
}

impl Repository for RingBuffer {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|err| Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: Entry) -> Result<(), Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| Error::Unknown(err.to_string()))?;
        if entries.len() >= CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
        Ok(())
    }
}

static LOGGER: Logger = Logger;

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(storage: Arc<dyn Repository>, level: LevelFilter) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(storage);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = entry(record, Local::now().format("%b %d %H:%M:%S").to_string());
        eprintln!("{} {:<5} {}", entry.time, entry.level, entry.message);
        if let Ok(log) = LOG.lock() {
            if let Some(ref log) = *log {
                let _ = log.write_entry(entry);
            }
        }
    }

    fn flush(&self) {}
}

fn entry(record: &Record, time: String) -> Entry {
    Entry {
        time,
        level: record.level(),
        message: record.args().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(message: &str) -> Entry {
        Entry {
            time: "Feb 02 18:30:00".to_string(),
            level: Level::Info,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_ring_buffer_keeps_latest_entries() {
        let buffer = RingBuffer::default();

        for i in 0..CAPACITY + 5 {
            buffer.write_entry(entry(&i.to_string())).unwrap();
        }

        let entries = buffer.read_entries().unwrap();
        assert_eq!(entries.len(), CAPACITY);
        assert_eq!(entries.front().unwrap().message, "5");
        assert_eq!(
            entries.back().unwrap().message,
            (CAPACITY + 4).to_string()
        );
    }

    #[test]
    fn test_entry_from_record() {
        assert_eq!(
            super::entry(
                &Record::builder()
                    .args(format_args!("stage: gateway"))
                    .level(Level::Debug)
                    .build(),
                "Feb 02 18:30:00".to_string()
            ),
            Entry {
                time: "Feb 02 18:30:00".to_string(),
                level: Level::Debug,
                message: "stage: gateway".to_string(),
            }
        );
    }

    #[test]
    fn test_entry_serialization() {
        let json = serde_json::to_string(&Entry {
            level: Level::Warn,
            ..entry("gateway unavailable")
        })
        .unwrap();

        assert_eq!(
            json,
            r#"{"time":"Feb 02 18:30:00","level":"Warn","message":"gateway unavailable"}"#
        );
        assert_eq!(
            serde_json::from_str::<Entry>(&json).unwrap().level,
            Level::Warn
        );
    }
}
