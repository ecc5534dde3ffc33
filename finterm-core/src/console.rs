//! Output sink for menu text.
//!
//! Everything the engine prints goes through a [`Console`] so tests can
//! capture it in memory instead of reading stdout.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

/// Write-only terminal output.
pub struct Console {
    sink: Box<dyn Write>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Print `text` followed by a newline.
    pub fn line(&mut self, text: impl Display) {
        let _ = writeln!(self.sink, "{text}");
    }

    /// Print `text` without a trailing newline.
    pub fn text(&mut self, text: impl Display) {
        let _ = write!(self.sink, "{text}");
        let _ = self.sink.flush();
    }

    pub fn blank(&mut self) {
        self.line("");
    }

    /// Clear the screen and home the cursor.
    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.sink, Clear(ClearType::All), MoveTo(0, 0))
    }
}

/// Shared in-memory sink; clones see the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
