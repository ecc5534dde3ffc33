//! Canonical menu paths.
//!
//! A path identifies a menu's position in the menu tree: `/` is the root,
//! `/stocks/options/` is two levels below it. The string form always starts
//! and ends with `/` and holds only lowercase ASCII letters and separators.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Errors from path validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("menu path must not be empty")]
    Empty,
    #[error("menu path '{0}' must start and end with '/'")]
    Unanchored(String),
    #[error("menu path '{path}' contains '{ch}' (only lowercase letters and '/' are allowed)")]
    InvalidChar { path: String, ch: char },
}

/// A validated menu path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuPath {
    raw: String,
}

impl MenuPath {
    /// Validate and wrap a path string.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        if !raw.starts_with(SEPARATOR) || !raw.ends_with(SEPARATOR) {
            return Err(PathError::Unanchored(raw.to_string()));
        }
        if let Some(ch) = raw
            .chars()
            .find(|c| *c != SEPARATOR && !c.is_ascii_lowercase())
        {
            return Err(PathError::InvalidChar {
                path: raw.to_string(),
                ch,
            });
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// The application root, `/`.
    pub fn root() -> Self {
        Self {
            raw: SEPARATOR.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when no segment sits between the separators.
    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }

    /// Non-empty segments, outermost first: `/stocks/options/` → `stocks`, `options`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of menus between the root and this one (inclusive of this one).
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Absolute navigation command reaching this menu from anywhere
    /// (`/stocks/options/` → `/stocks/options`). Empty at the root.
    pub fn to_navigation(&self) -> String {
        if self.is_root() {
            return String::new();
        }
        self.segments()
            .fold(String::new(), |acc, seg| format!("{acc}{SEPARATOR}{seg}"))
    }
}

impl fmt::Display for MenuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for MenuPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for MenuPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
