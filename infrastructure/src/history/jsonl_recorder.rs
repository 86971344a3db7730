//! JSONL file writer for roundtable events.
//!
//! Each [`RoundtableEvent`] is serialized in its own tagged shape with an
//! added `timestamp`, one object per line, appended via a buffered writer.

use chrono::{DateTime, Local};
use roundtable_application::EventRecorder;
use roundtable_domain::RoundtableEvent;
use roundtable_domain::core::string::slugify;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Longest topic slug used in history file names
const MAX_SLUG_LEN: usize = 48;

/// File name for a discussion started at `started` on `topic`:
/// `<YYYYmmdd-HHMMSS>-<topic-slug>.jsonl`.
pub fn history_file_name(started: DateTime<Local>, topic: &str) -> String {
    format!(
        "{}-{}.jsonl",
        started.format("%Y%m%d-%H%M%S"),
        slugify(topic, MAX_SLUG_LEN)
    )
}

/// JSONL discussion recorder that writes one JSON object per event.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlDiscussionRecorder {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlDiscussionRecorder {
    /// Create a new recorder writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create history directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create history file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Create a recorder in `dir` named after the topic and current time.
    pub fn in_dir(dir: impl AsRef<Path>, topic: &str) -> Option<Self> {
        Self::new(dir.as_ref().join(history_file_name(Local::now(), topic)))
    }

    /// Get the path to the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventRecorder for JsonlDiscussionRecorder {
    fn handle_event(&self, event: &RoundtableEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(serde_json::Value::Object(mut record)) = serde_json::to_value(event) else {
            return;
        };
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // JSONL is append-only; a crash loses at most the current line
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlDiscussionRecorder {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
