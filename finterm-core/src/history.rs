//! Prompt history persistence: JSON save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Most recent lines kept.
pub const MAX_HISTORY: usize = 500;

/// Submitted prompt lines, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submitted line. Blank lines and repeats of the last entry are skipped.
    pub fn push(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.entries.last().map(String::as_str) == Some(line) {
            return;
        }
        self.entries.push(line.to_string());
        if self.entries.len() > MAX_HISTORY {
            let excess = self.entries.len() - MAX_HISTORY;
            self.entries.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// `<data_dir>/finterm/history.json`
pub fn default_history_path() -> PathBuf {
    crate::config::data_dir().join("history.json")
}

/// Load history from disk. Returns an empty history if the file is missing or corrupt.
pub fn load(path: &Path) -> History {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => History::default(),
    }
}

/// Save history to disk. Creates parent directories if needed.
pub fn save(path: &Path, history: &History) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(history)?;
    std::fs::write(path, json)?;
    Ok(())
}
