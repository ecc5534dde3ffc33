//! Reading command lines: interactive editor with completion, plain stdin,
//! or a scripted list for tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};

use crate::history::History;

/// Result of one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl+C at the prompt.
    Interrupted,
    /// Input closed (Ctrl+D on an empty line, or end of stdin).
    Eof,
}

/// Source of command lines for the menu loop.
pub trait LinePrompt {
    /// Show `prompt` and read one line. `choices` are the completion candidates.
    fn read_line(&mut self, prompt: &str, choices: &[String]) -> io::Result<ReadOutcome>;

    /// Submitted-line history, for backends that keep one.
    fn history(&self) -> Option<&History> {
        None
    }
}

// ── Plain stdin ──────────────────────────────────────────────────────

/// Blocking line read without editing or completion.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl LinePrompt for StdinPrompt {
    fn read_line(&mut self, prompt: &str, _choices: &[String]) -> io::Result<ReadOutcome> {
        let mut out = io::stdout();
        write!(out, "{prompt}")?;
        out.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        Ok(ReadOutcome::Line(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

// ── Scripted ─────────────────────────────────────────────────────────

/// Replays fixed lines, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    lines: VecDeque<ReadOutcome>,
    prompts: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|l| ReadOutcome::Line(l.into()))
                .collect(),
            prompts: Vec::new(),
        }
    }

    /// Queue a Ctrl+C after the scripted lines.
    pub fn then_interrupt(mut self) -> Self {
        self.lines.push_back(ReadOutcome::Interrupted);
        self
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LinePrompt for ScriptedPrompt {
    fn read_line(&mut self, prompt: &str, _choices: &[String]) -> io::Result<ReadOutcome> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front().unwrap_or(ReadOutcome::Eof))
    }
}

// ── Interactive editor ───────────────────────────────────────────────

/// What the editor wants after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Continue,
    Submit(String),
    Interrupt,
    Eof,
}

#[derive(Debug)]
struct Completion {
    matches: Vec<String>,
    index: usize,
}

/// Single-line editor state, driven one key at a time.
///
/// Tab completes the command token against `choices`; pressing it again
/// cycles through the other matches.
pub struct LineEditor<'a> {
    buffer: Vec<char>,
    cursor: usize,
    choices: &'a [String],
    history: &'a History,
    history_pos: Option<usize>,
    draft: Vec<char>,
    completion: Option<Completion>,
}

impl<'a> LineEditor<'a> {
    pub fn new(choices: &'a [String], history: &'a History) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            choices,
            history,
            history_pos: None,
            draft: Vec::new(),
            completion: None,
        }
    }

    pub fn line(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditAction {
        // Only handle key press events (Windows sends both Press and Release).
        if key.kind != KeyEventKind::Press {
            return EditAction::Continue;
        }
        if key.code != KeyCode::Tab {
            self.completion = None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return EditAction::Interrupt,
                KeyCode::Char('d') if self.buffer.is_empty() => return EditAction::Eof,
                KeyCode::Char('u') => self.set_line(""),
                KeyCode::Char('a') => self.cursor = 0,
                KeyCode::Char('e') => self.cursor = self.buffer.len(),
                _ => {}
            }
            return EditAction::Continue;
        }

        match key.code {
            KeyCode::Enter => return EditAction::Submit(self.line()),
            KeyCode::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.buffer.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            KeyCode::Up => self.history_prev(),
            KeyCode::Down => self.history_next(),
            KeyCode::Tab => self.complete(),
            _ => {}
        }
        EditAction::Continue
    }

    fn set_line(&mut self, line: &str) {
        self.buffer = line.chars().collect();
        self.cursor = self.buffer.len();
    }

    fn complete(&mut self) {
        if self.buffer.iter().any(|c| c.is_whitespace()) {
            return;
        }
        let next = match self.completion.as_mut() {
            Some(cycle) => {
                cycle.index = (cycle.index + 1) % cycle.matches.len();
                cycle.matches[cycle.index].clone()
            }
            None => {
                let prefix = self.line();
                let mut matches: Vec<String> = self
                    .choices
                    .iter()
                    .filter(|choice| choice.starts_with(&prefix))
                    .cloned()
                    .collect();
                matches.sort();
                matches.dedup();
                let Some(first) = matches.first().cloned() else {
                    return;
                };
                self.completion = Some(Completion { matches, index: 0 });
                first
            }
        };
        self.set_line(&next);
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => {
                self.draft = self.buffer.clone();
                self.history.len() - 1
            }
            Some(pos) => pos.saturating_sub(1),
        };
        self.history_pos = Some(pos);
        if let Some(entry) = self.history.get(pos) {
            self.set_line(entry);
        }
    }

    fn history_next(&mut self) {
        match self.history_pos {
            None => {}
            Some(pos) if pos + 1 < self.history.len() => {
                self.history_pos = Some(pos + 1);
                if let Some(entry) = self.history.get(pos + 1) {
                    self.set_line(entry);
                }
            }
            Some(_) => {
                self.history_pos = None;
                self.buffer = std::mem::take(&mut self.draft);
                self.cursor = self.buffer.len();
            }
        }
    }
}

/// Raw-mode line editor on the real terminal.
#[derive(Debug, Default)]
pub struct CompletingPrompt {
    history: History,
}

impl CompletingPrompt {
    pub fn new(history: History) -> Self {
        Self { history }
    }

    fn edit(&self, out: &mut impl Write, prompt: &str, choices: &[String]) -> io::Result<ReadOutcome> {
        let mut editor = LineEditor::new(choices, &self.history);
        render(out, prompt, &editor)?;
        loop {
            if let Event::Key(key) = event::read()? {
                match editor.handle_key(key) {
                    EditAction::Continue => render(out, prompt, &editor)?,
                    EditAction::Submit(line) => return Ok(ReadOutcome::Line(line)),
                    EditAction::Interrupt => return Ok(ReadOutcome::Interrupted),
                    EditAction::Eof => return Ok(ReadOutcome::Eof),
                }
            }
        }
    }
}

impl LinePrompt for CompletingPrompt {
    fn read_line(&mut self, prompt: &str, choices: &[String]) -> io::Result<ReadOutcome> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        let result = self.edit(&mut out, prompt, choices);
        let restored = terminal::disable_raw_mode();
        write!(out, "\r\n")?;
        out.flush()?;
        restored?;

        let outcome = result?;
        if let ReadOutcome::Line(line) = &outcome {
            self.history.push(line);
        }
        Ok(outcome)
    }

    fn history(&self) -> Option<&History> {
        Some(&self.history)
    }
}

fn render(out: &mut impl Write, prompt: &str, editor: &LineEditor<'_>) -> io::Result<()> {
    let column = prompt.chars().count() + editor.cursor();
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(prompt),
        Print(editor.line()),
        MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        ["stocks", "crypto", "cls", "help", "home", "quit"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn type_str(editor: &mut LineEditor<'_>, text: &str) {
        for c in text.chars() {
            editor.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_submit() {
        let choices = choices();
        let history = History::new();
        let mut editor = LineEditor::new(&choices, &history);
        type_str(&mut editor, "load aapl");
        assert_eq!(
            editor.handle_key(KeyEvent::from(KeyCode::Enter)),
            EditAction::Submit("load aapl".into())
        );
    }

    #[test]
    fn backspace_and_cursor_moves() {
        let choices = choices();
        let history = History::new();
        let mut editor = LineEditor::new(&choices, &history);
        type_str(&mut editor, "lod");
        editor.handle_key(KeyEvent::from(KeyCode::Left));
        editor.handle_key(KeyEvent::from(KeyCode::Char('a')));
        assert_eq!(editor.line(), "load");
        editor.handle_key(KeyEvent::from(KeyCode::End));
        editor.handle_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(editor.line(), "loa");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn tab_completes_unique_prefix() {
        let choices = choices();
        let history = History::new();
        let mut editor = LineEditor::new(&choices, &history);
        type_str(&mut editor, "st");
        editor.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(editor.line(), "stocks");
    }

    #[test]
    fn tab_cycles_matches() {
        let choices = choices();
        let history = History::new();
        let mut editor = LineEditor::new(&choices, &history);
        type_str(&mut editor, "h");
        editor.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(editor.line(), "help");
        editor.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(editor.line(), "home");
        editor.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(editor.line(), "help");
    }

    #[test]
    fn tab_ignored_after_arguments() {
        let choices = choices();
        let history = History::new();
        let mut editor = LineEditor::new(&choices, &history);
        type_str(&mut editor, "load c");
        editor.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(editor.line(), "load c");
    }

    #[test]
    fn ctrl_c_interrupts_and_ctrl_d_ends() {
        let choices = choices();
        let history = History::new();
        let mut editor = LineEditor::new(&choices, &history);
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(ctrl_d), EditAction::Eof);

        type_str(&mut editor, "x");
        assert_eq!(editor.handle_key(ctrl_d), EditAction::Continue);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(ctrl_c), EditAction::Interrupt);
    }

    #[test]
    fn history_browsing_restores_draft() {
        let choices = choices();
        let mut history = History::new();
        history.push("stocks");
        history.push("load AAPL");
        let mut editor = LineEditor::new(&choices, &history);
        type_str(&mut editor, "dr");

        editor.handle_key(KeyEvent::from(KeyCode::Up));
        assert_eq!(editor.line(), "load AAPL");
        editor.handle_key(KeyEvent::from(KeyCode::Up));
        assert_eq!(editor.line(), "stocks");
        editor.handle_key(KeyEvent::from(KeyCode::Up));
        assert_eq!(editor.line(), "stocks");
        editor.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(editor.line(), "load AAPL");
        editor.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(editor.line(), "dr");
    }

    #[test]
    fn scripted_prompt_ends_with_eof() {
        let mut prompt = ScriptedPrompt::new(["stocks"]).then_interrupt();
        assert_eq!(
            prompt.read_line("/ $ ", &[]).unwrap(),
            ReadOutcome::Line("stocks".into())
        );
        assert_eq!(prompt.read_line("/ $ ", &[]).unwrap(), ReadOutcome::Interrupted);
        assert_eq!(prompt.read_line("/ $ ", &[]).unwrap(), ReadOutcome::Eof);
        assert_eq!(prompt.prompts().len(), 3);
    }
}
