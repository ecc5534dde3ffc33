//! The menu state machine.
//!
//! A [`Controller`] owns one menu's path, its pending command queue and the
//! menu's own state. [`Controller::menu`] runs the REPL loop for that menu:
//! queued commands first, then prompted ones. Entering a submenu recurses
//! into the child's loop; the child's leftover queue becomes the parent's
//! queue when it returns.
//!
//! Menus plug in through the [`Menu`] trait and a [`CommandTable`] that maps
//! each command name to a handler function. The table is checked when the
//! controller is built, so a missing or clashing command is a construction
//! error instead of a lookup failure at runtime.

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::args::parse_args;
use crate::command::{
    is_quit_token, normalize, split_compound, Builtin, CommandLine, RESET_SENTINEL,
};
use crate::console::Console;
use crate::fuzzy::closest_match;
use crate::help;
use crate::path::{MenuPath, PathError, SEPARATOR};
use crate::prompt::ReadOutcome;
use crate::queue::CommandQueue;
use crate::session::Session;

/// Fatal engine errors. These escape every menu loop and end the program.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid menu path: {0}")]
    Path(#[from] PathError),
    #[error("menu {path}: command '{name}' is declared more than once")]
    DuplicateCommand { path: String, name: String },
    #[error("menu {path}: command '{name}' clashes with a universal command")]
    ReservedCommand { path: String, name: String },
    #[error("menu {path}: '{name}' is not a valid command name")]
    InvalidCommandName { path: String, name: String },
}

/// Outcome of dispatching one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The line was handled (or queued for later).
    Handled,
    /// No handler for this command token.
    Unrecognized(String),
}

/// A menu-specific command handler.
pub type Handler<M> = fn(&mut M, &[String], &mut MenuContext<'_>) -> anyhow::Result<()>;

/// Whether a command does work in place or opens another menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Action,
    Submenu,
}

/// One entry in a [`CommandTable`].
pub struct CommandSpec<M> {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
    pub handler: Handler<M>,
}

/// Explicit name → handler mapping for one menu.
pub struct CommandTable<M> {
    entries: Vec<CommandSpec<M>>,
}

impl<M> Default for CommandTable<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<M> CommandTable<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command that runs in this menu.
    pub fn command(self, name: &'static str, description: &'static str, handler: Handler<M>) -> Self {
        self.with(name, description, CommandKind::Action, handler)
    }

    /// Add a command that enters a child menu.
    pub fn submenu(self, name: &'static str, description: &'static str, handler: Handler<M>) -> Self {
        self.with(name, description, CommandKind::Submenu, handler)
    }

    fn with(
        mut self,
        name: &'static str,
        description: &'static str,
        kind: CommandKind,
        handler: Handler<M>,
    ) -> Self {
        self.entries.push(CommandSpec {
            name,
            description,
            kind,
            handler,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec<M>> {
        self.entries.iter().find(|spec| spec.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|spec| spec.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec<M>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self, path: &MenuPath) -> Result<(), EngineError> {
        for (i, spec) in self.entries.iter().enumerate() {
            let name = spec.name;
            let err_fields = || (path.to_string(), name.to_string());
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                let (path, name) = err_fields();
                return Err(EngineError::InvalidCommandName { path, name });
            }
            if Builtin::all_tokens().any(|token| token == name) {
                let (path, name) = err_fields();
                return Err(EngineError::ReservedCommand { path, name });
            }
            if self.entries[..i].iter().any(|earlier| earlier.name == name) {
                let (path, name) = err_fields();
                return Err(EngineError::DuplicateCommand { path, name });
            }
        }
        Ok(())
    }
}

/// A menu: its location, its commands and its state.
pub trait Menu: Sized + 'static {
    /// Canonical path, e.g. `/stocks/options/`.
    const PATH: &'static str;

    /// The menu's own commands. Universal commands are added by the engine.
    fn commands() -> CommandTable<Self>;

    /// Label/value lines shown at the top of the help screen.
    fn status(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn print_help(&self, path: &MenuPath, commands: &CommandTable<Self>) -> String {
        help::render(path, &self.status(), commands)
    }

    /// Commands that rebuild this menu's context after `reset`. Empty means
    /// "navigate back along the path".
    fn custom_reset(&self) -> Vec<String> {
        Vec::new()
    }
}

/// What a handler can reach while it runs.
pub struct MenuContext<'a> {
    queue: &'a mut CommandQueue,
    session: &'a mut Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Load {
    /// Built from the queue alone; may resume a saved instance.
    Resumable,
    /// Built from extra arguments; always constructed anew.
    Fresh,
}

impl<'a> MenuContext<'a> {
    fn new(queue: &'a mut CommandQueue, session: &'a mut Session) -> Self {
        Self { queue, session }
    }

    pub fn console(&mut self) -> &mut Console {
        self.session.console()
    }

    /// Parse handler arguments; usage and errors are printed for the caller.
    pub fn parse_args<T: Parser>(&mut self, command: &str, args: &[String]) -> Option<T> {
        parse_args(command, args, self.session.console())
    }

    /// Enter a child menu built only from the pending queue. With
    /// remember-contexts on, a saved instance at the child's path is resumed
    /// instead and `build` is not called.
    pub fn enter<C: Menu>(&mut self, build: impl FnOnce() -> C) -> Result<(), EngineError> {
        self.load(Load::Resumable, build, None)
    }

    /// Enter a child menu constructed from `state`, never resuming.
    pub fn enter_fresh<C: Menu>(&mut self, state: C) -> Result<(), EngineError> {
        self.load(Load::Fresh, || state, None)
    }

    /// Like [`MenuContext::enter_fresh`], but when the child quits, `above`
    /// is queued first so the user lands in the menu it names rather than
    /// back here.
    pub fn enter_fresh_from<C: Menu>(&mut self, state: C, above: &str) -> Result<(), EngineError> {
        self.load(Load::Fresh, || state, Some(above))
    }

    fn load<C: Menu>(
        &mut self,
        load: Load,
        build: impl FnOnce() -> C,
        above: Option<&str>,
    ) -> Result<(), EngineError> {
        let queue = self.queue.take();
        let saved = match load {
            Load::Resumable if self.session.flags().remember_contexts => {
                self.session.registry_mut().take::<C>(C::PATH)
            }
            _ => None,
        };

        let mut child = match saved {
            Some(mut child) => {
                info!(path = C::PATH, "resuming remembered menu");
                child.resume_with(queue);
                child
            }
            None => Box::new(Controller::new(build(), queue)?),
        };

        let continuation = child.menu_from(self.session, above)?;
        self.session.remember(child);
        self.queue.replace(continuation);
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(name = "record", about = "Start recording typed commands into a routine")]
struct RecordArgs {
    /// Routine file name (letters, digits, '-' and '_').
    #[arg(short, long, value_parser = parse_routine_name)]
    name: Option<String>,
}

fn parse_routine_name(s: &str) -> Result<String, String> {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(s.to_string())
    } else {
        Err(format!("'{s}' is not a valid routine name"))
    }
}

/// One menu's engine state plus the menu itself.
pub struct Controller<M: Menu> {
    path: MenuPath,
    queue: CommandQueue,
    commands: CommandTable<M>,
    choices: Vec<String>,
    state: M,
}

impl<M: Menu> Controller<M> {
    /// Validate `M::PATH` and the command table. The root ignores `queue`.
    pub fn new(state: M, queue: impl Into<CommandQueue>) -> Result<Self, EngineError> {
        let path = MenuPath::parse(M::PATH)?;
        let commands = M::commands();
        commands.validate(&path)?;

        let mut choices: Vec<String> = Builtin::all_tokens()
            .chain(commands.names())
            .map(String::from)
            .collect();
        choices.sort();

        let queue = if path.is_root() {
            CommandQueue::new()
        } else {
            queue.into()
        };

        Ok(Self {
            path,
            queue,
            commands,
            choices,
            state,
        })
    }

    pub fn path(&self) -> &MenuPath {
        &self.path
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Direct queue access, for scripted sessions fed after construction.
    pub fn queue_mut(&mut self) -> &mut CommandQueue {
        &mut self.queue
    }

    pub fn state(&self) -> &M {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut M {
        &mut self.state
    }

    /// Every token this menu recognizes, aliases included, sorted.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn is_choice(&self, token: &str) -> bool {
        self.choices.iter().any(|choice| choice == token)
    }

    fn resume_with(&mut self, queue: CommandQueue) {
        self.queue = queue;
    }

    /// Run this menu until it quits; returns the commands left for the parent.
    pub fn menu(&mut self, session: &mut Session) -> Result<Vec<String>, EngineError> {
        self.menu_from(session, None)
    }

    fn menu_from(
        &mut self,
        session: &mut Session,
        above: Option<&str>,
    ) -> Result<Vec<String>, EngineError> {
        info!(path = %self.path, queued = self.queue.len(), "entering menu");
        let mut show_help = self.queue.is_empty();

        loop {
            if self.path.is_root() && session.exit_requested() {
                info!("exit requested, leaving terminal");
                return Ok(Vec::new());
            }
            let help_due = std::mem::replace(&mut show_help, false);

            let line = if let Some(head) = self.queue.pop_front() {
                if is_quit_token(&head) {
                    return Ok(self.leave(session, above));
                }
                self.breadcrumb(&head, session);
                head
            } else {
                if help_due {
                    self.call_help(session);
                }
                self.read_typed(session)
            };

            match self.switch(&line, session)? {
                Dispatch::Handled => {}
                Dispatch::Unrecognized(command) => self.recover(&line, &command, session),
            }
        }
    }

    fn leave(&mut self, session: &Session, above: Option<&str>) -> Vec<String> {
        if let Some(marker) = above {
            self.queue.push_front(marker);
        }
        info!(path = %self.path, remaining = self.queue.len(), "leaving menu");
        if !self.queue.is_empty() {
            return self.queue.take().into_vec();
        }
        if session.flags().exit_auto_help {
            vec![Builtin::Help.name().to_string()]
        } else {
            Vec::new()
        }
    }

    fn breadcrumb(&self, line: &str, session: &mut Session) {
        if let Some(first) = line.split_whitespace().next() {
            if first != Builtin::Home.name() && self.is_choice(first) {
                session.console().line(format!("{} $ {line}", self.path));
            }
        }
    }

    fn read_typed(&self, session: &mut Session) -> String {
        let prompt = format!("{} $ ", self.path);
        match session.read_line(&prompt, &self.choices) {
            ReadOutcome::Line(line) => {
                if !line.trim().is_empty() {
                    if session.flags().clear_after_command {
                        if let Err(err) = session.console().clear() {
                            warn!(error = %err, "failed to clear screen");
                        }
                    }
                    if !is_recording_control(&line) {
                        session.recorder_mut().capture(&line);
                    }
                }
                line
            }
            ReadOutcome::Interrupted | ReadOutcome::Eof => Builtin::Exit.name().to_string(),
        }
    }

    /// Dispatch one line: compound input is queued, universal commands run
    /// on the controller, anything else goes to the menu's handler.
    pub fn switch(&mut self, line: &str, session: &mut Session) -> Result<Dispatch, EngineError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Dispatch::Handled);
        }

        if line.contains(SEPARATOR) {
            let commands = split_compound(line);
            debug!(path = %self.path, ?commands, "queueing compound input");
            self.queue.prepend(commands);
            return Ok(Dispatch::Handled);
        }

        let Some(CommandLine { name, args }) = CommandLine::parse(line) else {
            return Ok(Dispatch::Handled);
        };
        let command = normalize(&name);

        if let Some(builtin) = Builtin::from_name(command) {
            self.run_builtin(builtin, &args, session);
            return Ok(Dispatch::Handled);
        }

        let Some(handler) = self.commands.get(command).map(|spec| spec.handler) else {
            debug!(path = %self.path, command, "unrecognized command");
            return Ok(Dispatch::Unrecognized(name));
        };

        debug!(path = %self.path, command, ?args, "dispatching");
        let result = {
            let mut cx = MenuContext::new(&mut self.queue, session);
            handler(&mut self.state, &args, &mut cx)
        };
        if let Err(err) = result {
            match err.downcast::<EngineError>() {
                Ok(fatal) => return Err(fatal),
                Err(err) => {
                    warn!(path = %self.path, command, error = %err, "command failed");
                    session
                        .console()
                        .line(format!("{} {command}: {err:#}", self.path));
                }
            }
        }
        Ok(Dispatch::Handled)
    }

    fn run_builtin(&mut self, builtin: Builtin, args: &[String], session: &mut Session) {
        match builtin {
            Builtin::Cls => self.call_cls(session),
            Builtin::Home => self.call_home(session),
            Builtin::Help => self.call_help(session),
            Builtin::Quit => self.call_quit(),
            Builtin::Exit => self.call_exit(session),
            Builtin::Reset => self.call_reset(session),
            Builtin::Record => self.call_record(args, session),
            Builtin::Stop => self.call_stop(session),
        }
    }

    /// Try to turn an unknown command into a close one; otherwise drop it.
    fn recover(&mut self, line: &str, command: &str, session: &mut Session) {
        session.console().text(format!(
            "\nThe command '{line}' doesn't exist on the {} menu.",
            self.path
        ));

        let Some(candidate) = closest_match(command, self.choices.iter().map(String::as_str))
        else {
            session.console().blank();
            session.console().blank();
            return;
        };

        let args: Vec<&str> = line.split_whitespace().skip(1).collect();
        let replacement = if args.is_empty() {
            candidate.to_string()
        } else {
            format!("{candidate} {}", args.join(" "))
        };

        info!(path = %self.path, from = command, to = candidate, "substituting close command");
        session
            .console()
            .line(format!(" Replacing by '{replacement}'."));
        self.queue.push_front(replacement);
    }

    // ── Universal commands ───────────────────────────────────────────

    pub fn call_cls(&mut self, session: &mut Session) {
        if let Err(err) = session.console().clear() {
            warn!(error = %err, "failed to clear screen");
        }
    }

    /// Print the help screen. Never touches the queue.
    pub fn call_help(&self, session: &mut Session) {
        let text = self.state.print_help(&self.path, &self.commands);
        session.console().text(text);
    }

    pub fn call_quit(&mut self) {
        self.queue.push_front("quit");
    }

    /// Unwind to the root. The controller is saved to the registry when its
    /// loop returns.
    pub fn call_home(&mut self, session: &mut Session) {
        if self.path.is_root() {
            if session.flags().exit_auto_help {
                self.call_help(session);
            }
            return;
        }
        for _ in 0..self.path.depth() {
            self.queue.push_front("quit");
        }
    }

    /// Unwind every menu and end the session.
    pub fn call_exit(&mut self, session: &mut Session) {
        for _ in 0..self.path.depth() {
            self.queue.push_front("quit");
        }
        session.request_exit();
    }

    /// Away from the root: unwind, mark the reset, then replay the context.
    /// At the root: forget every remembered menu so the replay starts clean.
    pub fn call_reset(&mut self, session: &mut Session) {
        if self.path.is_root() {
            let dropped = session.registry_mut().clear();
            info!(dropped, "reset: cleared remembered menus");
            return;
        }

        let mut replay = self.state.custom_reset();
        if replay.is_empty() {
            replay = self.path.segments().map(String::from).collect();
        }
        self.queue.prepend(replay);
        self.queue.push_front(RESET_SENTINEL);
        for _ in 0..self.path.depth() {
            self.queue.push_front("quit");
        }
    }

    pub fn call_record(&mut self, args: &[String], session: &mut Session) {
        let Some(parsed) = parse_args::<RecordArgs>("record", args, session.console()) else {
            return;
        };
        if session.recorder_mut().start(parsed.name, &self.path) {
            info!(path = %self.path, "recording started");
            session
                .console()
                .line("Recording started. Type 'stop' to save the routine.");
        } else {
            session.console().line("Already recording.");
        }
    }

    pub fn call_stop(&mut self, session: &mut Session) {
        let Some(recorded) = session.recorder_mut().stop() else {
            session
                .console()
                .line("No recording in progress. Use 'record' to start one.");
            return;
        };
        if recorded.routine.is_empty() {
            session.console().line("Nothing was recorded.");
            return;
        }

        let path = session.flags().routines_dir.join(&recorded.file_name);
        let header = format!(
            "finterm routine recorded {}",
            recorded.started.format("%Y-%m-%d %H:%M:%S")
        );
        match recorded.routine.save(&path, &header) {
            Ok(()) => {
                info!(path = %path.display(), commands = recorded.routine.commands.len(), "routine saved");
                session
                    .console()
                    .line(format!("Routine saved to {}", path.display()));
            }
            Err(err) => {
                warn!(error = %err, "failed to save routine");
                session.console().line(format!("Could not save routine: {err}"));
            }
        }
    }
}

fn is_recording_control(line: &str) -> bool {
    matches!(
        line.split_whitespace().next(),
        Some(token) if token == Builtin::Record.name() || token == Builtin::Stop.name()
    )
}
