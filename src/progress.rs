use crate::constants::PROGRESS_TIMESTAMP_FORMAT;
use crate::error::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Destination for stage progress messages.
pub trait ProgressSink {
    fn record(&self, message: &str) -> Result<()>;
}

/// Appends `<timestamp>,<message>` lines to a text file. The file is never read,
/// rotated or truncated.
pub struct FileProgressLog {
    path: PathBuf,
}

impl FileProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressSink for FileProgressLog {
    fn record(&self, message: &str) -> Result<()> {
        let line = format_entry(&Local::now().format(PROGRESS_TIMESTAMP_FORMAT).to_string(), message);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        debug!(path = %self.path.display(), "{}", message);
        Ok(())
    }
}

/// Keeps messages in memory; used where the filesystem should stay untouched.
#[derive(Default)]
pub struct MemoryProgressLog {
    messages: Mutex<Vec<String>>,
}

impl MemoryProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for MemoryProgressLog {
    fn record(&self, message: &str) -> Result<()> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
        Ok(())
    }
}

fn format_entry(timestamp: &str, message: &str) -> String {
    format!("{},{}\n", timestamp, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn timestamp_uses_abbreviated_month() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 2, 9)
            .unwrap()
            .format(PROGRESS_TIMESTAMP_FORMAT)
            .to_string();
        assert_eq!(ts, "2024-Mar-05-14:02:09");
        assert_eq!(format_entry(&ts, "Start extracting data"), "2024-Mar-05-14:02:09,Start extracting data\n");
    }

    #[test]
    fn file_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code_log.txt");
        fs::write(&path, "earlier run\n").unwrap();

        let log = FileProgressLog::new(&path);
        log.record("Start extracting data").unwrap();
        log.record("End extracting data").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");
        assert!(lines[1].ends_with(",Start extracting data"));
        assert!(lines[2].ends_with(",End extracting data"));
        // YYYY-Mon-DD-HH:MM:SS is always 20 characters
        assert_eq!(lines[1].split(',').next().unwrap().len(), 20);
    }

    #[test]
    fn file_log_fails_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileProgressLog::new(dir.path().join("missing").join("code_log.txt"));
        assert!(log.record("Start extracting data").is_err());
    }

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryProgressLog::new();
        log.record("a").unwrap();
        log.record("b").unwrap();
        assert_eq!(log.messages(), vec!["a", "b"]);
    }
}
