//! Routine files and the session recorder that produces them.
//!
//! A routine is a plain-text list of command lines, one per line. Blank lines
//! and `#` comments are skipped when loading.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::path::MenuPath;

/// File extension for saved routines.
pub const ROUTINE_EXTENSION: &str = "finterm";

/// Errors from reading or writing routine files.
#[derive(Debug, Error)]
pub enum RoutineError {
    #[error("failed to read routine '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write routine '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An ordered list of command lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routine {
    pub commands: Vec<String>,
}

impl Routine {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    /// Parse routine text, skipping blanks and comments.
    pub fn parse(text: &str) -> Self {
        let commands = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { commands }
    }

    pub fn load(path: &Path) -> Result<Self, RoutineError> {
        let text = std::fs::read_to_string(path).map_err(|source| RoutineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Write the routine with a leading comment. Creates parent directories.
    pub fn save(&self, path: &Path, header: &str) -> Result<(), RoutineError> {
        let write_err = |source| RoutineError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut text = format!("# {header}\n");
        for command in &self.commands {
            text.push_str(command);
            text.push('\n');
        }
        std::fs::write(path, text).map_err(write_err)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug)]
struct Recording {
    name: Option<String>,
    started: NaiveDateTime,
    commands: Vec<String>,
}

/// A finished recording, ready to be written out.
#[derive(Debug)]
pub struct RecordedRoutine {
    pub routine: Routine,
    pub file_name: String,
    pub started: NaiveDateTime,
}

/// Captures typed command lines between `record` and `stop`.
#[derive(Debug, Default)]
pub struct Recorder {
    active: Option<Recording>,
}

impl Recorder {
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Start recording from the menu at `location`. Returns false when a
    /// recording is already running.
    pub fn start(&mut self, name: Option<String>, location: &MenuPath) -> bool {
        if self.active.is_some() {
            return false;
        }
        let mut commands = Vec::new();
        if !location.is_root() {
            commands.push(location.to_navigation());
        }
        self.active = Some(Recording {
            name,
            started: Local::now().naive_local(),
            commands,
        });
        true
    }

    /// Capture one typed line. No-op when not recording.
    pub fn capture(&mut self, line: &str) {
        if let Some(recording) = self.active.as_mut() {
            let line = line.trim();
            if !line.is_empty() {
                recording.commands.push(line.to_string());
            }
        }
    }

    /// Finish the running recording, if any.
    pub fn stop(&mut self) -> Option<RecordedRoutine> {
        let recording = self.active.take()?;
        let stem = recording
            .name
            .unwrap_or_else(|| recording.started.format("%Y%m%d_%H%M%S").to_string());
        Some(RecordedRoutine {
            routine: Routine::new(recording.commands),
            file_name: format!("{stem}.{ROUTINE_EXTENSION}"),
            started: recording.started,
        })
    }
}
