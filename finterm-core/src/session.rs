//! Per-process session: remembered menus, feature flags, terminal I/O and
//! the routine recorder. One `Session` is threaded by `&mut` through every
//! menu loop.

use std::any::Any;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::FeatureFlags;
use crate::console::Console;
use crate::controller::{Controller, Menu};
use crate::history::History;
use crate::prompt::{CompletingPrompt, LinePrompt, ReadOutcome, StdinPrompt};
use crate::routine::Recorder;

/// Last controller instance per menu path.
#[derive(Default)]
pub struct ControllerRegistry {
    saved: HashMap<String, Box<dyn Any>>,
}

impl ControllerRegistry {
    /// Store `controller` under its path, replacing any earlier entry.
    pub fn save<M: Menu>(&mut self, controller: Box<Controller<M>>) {
        let path = controller.path().to_string();
        debug!(path = %path, "remembering menu");
        self.saved.insert(path, controller);
    }

    /// Remove and return the controller saved at `path`. An entry of another
    /// menu type counts as absent.
    pub fn take<M: Menu>(&mut self, path: &str) -> Option<Box<Controller<M>>> {
        self.saved.remove(path)?.downcast::<Controller<M>>().ok()
    }

    pub fn get<M: Menu>(&self, path: &str) -> Option<&Controller<M>> {
        self.saved.get(path)?.downcast_ref::<Controller<M>>()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.saved.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Forget everything; returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.saved.len();
        self.saved.clear();
        dropped
    }
}

pub struct Session {
    flags: FeatureFlags,
    registry: ControllerRegistry,
    console: Console,
    prompt: Box<dyn LinePrompt>,
    recorder: Recorder,
    exit_requested: bool,
}

impl Session {
    pub fn new(flags: FeatureFlags, console: Console, prompt: Box<dyn LinePrompt>) -> Self {
        Self {
            flags,
            registry: ControllerRegistry::default(),
            console,
            prompt,
            recorder: Recorder::default(),
            exit_requested: false,
        }
    }

    /// Stdout plus the prompt the flags ask for.
    pub fn interactive(flags: FeatureFlags, history: History) -> Self {
        let prompt: Box<dyn LinePrompt> = if flags.use_completion {
            Box::new(CompletingPrompt::new(history))
        } else {
            Box::new(StdinPrompt)
        };
        Self::new(flags, Console::stdout(), prompt)
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.registry
    }

    pub fn console(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn prompt(&self) -> &dyn LinePrompt {
        self.prompt.as_ref()
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Keep a finished controller for later re-entry, if remember-contexts is
    /// on; otherwise it is dropped here.
    pub fn remember<M: Menu>(&mut self, controller: Box<Controller<M>>) {
        if self.flags.remember_contexts {
            self.registry.save(controller);
        } else {
            debug!(path = M::PATH, "discarding menu state");
        }
    }

    /// Prompt for one line. A broken input stream reads as end of input.
    pub fn read_line(&mut self, prompt: &str, choices: &[String]) -> ReadOutcome {
        match self.prompt.read_line(prompt, choices) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "failed to read input");
                ReadOutcome::Eof
            }
        }
    }
}
