//! Activity logging to disk.
//!
//! When enabled, appends every activity line (system notices, chain events,
//! errors) to a daily log file named `activity_<date>.log` in the configured
//! log directory (default: `~/.local/share/ballotbox/logs/`).

use crate::app::state::{Message, MessageKind};
use crate::config::LoggingConfig;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Writes activity messages to daily log files.
///
/// File handles are cached for the lifetime of the logger to avoid repeated
/// opens. Falls back to `/dev/null` if a log file cannot be created.
pub struct ActivityLogger {
    enabled: bool,
    log_dir: String,
    file_handles: HashMap<String, fs::File>,
}

impl ActivityLogger {
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            log_dir: config.log_dir.clone(),
            file_handles: HashMap::new(),
        }
    }

    /// Append one message to today's log file. No-op if logging is disabled.
    pub fn log(&mut self, msg: &Message) {
        if !self.enabled {
            return;
        }

        let line = match msg.kind {
            MessageKind::System => format!("[{}] *** {}", msg.timestamp, msg.text),
            MessageKind::Chain => format!("[{}] >>> {}", msg.timestamp, msg.text),
            MessageKind::Error => format!("[{}] !!! {}", msg.timestamp, msg.text),
        };

        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let filename = format!("activity_{}.log", date);

        // Expand ~ in log_dir
        let log_dir = if self.log_dir.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                home.join(&self.log_dir[2..])
            } else {
                PathBuf::from(&self.log_dir)
            }
        } else {
            PathBuf::from(&self.log_dir)
        };

        let filepath = log_dir.join(&filename);

        let handle = self.file_handles.entry(filename).or_insert_with(|| {
            let _ = fs::create_dir_all(&log_dir);
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&filepath)
                .unwrap_or_else(|_| {
                    // Fallback: a handle that goes nowhere
                    OpenOptions::new()
                        .write(true)
                        .open(if cfg!(unix) { "/dev/null" } else { "NUL" })
                        .unwrap()
                })
        });

        let _ = writeln!(handle, "{}", line);
    }
}
