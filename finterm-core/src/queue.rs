//! Pending command lines, consumed front to back.

use std::collections::VecDeque;

/// Ordered list of raw command lines awaiting execution.
///
/// Commands only ever enter at the front (compound input, reset replay,
/// quit tokens) or at the back (scripted sessions, via `Extend`), and
/// leave from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    items: VecDeque<String>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn pop_front(&mut self) -> Option<String> {
        self.items.pop_front()
    }

    pub fn push_front(&mut self, command: impl Into<String>) {
        self.items.push_front(command.into());
    }

    /// Put `commands` ahead of everything already queued, keeping their order.
    pub fn prepend<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        for command in commands.into_iter().rev() {
            self.items.push_front(command.into());
        }
    }

    /// Move every command out, leaving this queue empty.
    pub fn take(&mut self) -> CommandQueue {
        std::mem::take(self)
    }

    /// Replace the whole queue, e.g. with a child menu's continuation.
    pub fn replace(&mut self, other: impl Into<CommandQueue>) {
        *self = other.into();
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items.into()
    }
}

impl From<Vec<String>> for CommandQueue {
    fn from(items: Vec<String>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl From<Vec<&str>> for CommandQueue {
    fn from(items: Vec<&str>) -> Self {
        items.into_iter().map(String::from).collect()
    }
}

impl FromIterator<String> for CommandQueue {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<String> for CommandQueue {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}
