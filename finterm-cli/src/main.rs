//! finterm CLI: interactive financial research terminal.
//!
//! Starts at the root menu. Commands given on the command line (joined with
//! `/`) or read from a routine file run first; the prompt takes over once
//! they are used up.
//!
//! ```text
//! finterm                               # interactive
//! finterm stocks "load aapl" options    # start in /stocks/options/
//! finterm --file morning.finterm        # replay a recorded routine
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use finterm_core::config::default_config_path;
use finterm_core::{history, Controller, FeatureFlags, Routine, Session};
use finterm_menus::RootMenu;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "finterm",
    version,
    about = "finterm, a menu-driven financial research terminal"
)]
struct Cli {
    /// Commands to run first, joined with '/' (e.g. stocks "load aapl").
    #[arg(conflicts_with = "file")]
    commands: Vec<String>,

    /// Replay a routine file before prompting.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Feature flag file. Defaults to <config dir>/finterm/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plain prompt without tab completion or history.
    #[arg(long, default_value_t = false)]
    no_completion: bool,

    /// Resume menus where they were left.
    #[arg(long, default_value_t = false)]
    remember_contexts: bool,

    /// Don't show the parent's help after leaving a menu.
    #[arg(long, default_value_t = false)]
    no_exit_help: bool,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Config file flags with command-line overrides applied.
    fn feature_flags(&self) -> Result<FeatureFlags> {
        let mut flags = match &self.config {
            Some(path) => FeatureFlags::from_file(path)?,
            None => FeatureFlags::load_or_default(&default_config_path())?,
        };
        if self.no_completion {
            flags.use_completion = false;
        }
        if self.remember_contexts {
            flags.remember_contexts = true;
        }
        if self.no_exit_help {
            flags.exit_auto_help = false;
        }
        Ok(flags)
    }

    /// Commands queued on the root before the first prompt.
    fn initial_commands(&self) -> Result<Vec<String>> {
        if let Some(path) = &self.file {
            let routine = Routine::load(path)
                .with_context(|| format!("cannot replay {}", path.display()))?;
            info!(path = %path.display(), commands = routine.commands.len(), "replaying routine");
            return Ok(routine.commands);
        }
        if self.commands.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![self.commands.join("/")])
    }
}

fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let flags = cli.feature_flags()?;
    debug!(?flags, "feature flags");
    let initial = cli.initial_commands()?;

    let history_path = history::default_history_path();
    let mut session = Session::interactive(flags, history::load(&history_path));

    let mut root = Controller::new(RootMenu, Vec::<String>::new())?;
    root.queue_mut().extend(initial);
    root.menu(&mut session)?;

    if let Some(history) = session.prompt().history() {
        if let Err(err) = history::save(&history_path, history) {
            warn!(error = %err, "failed to save prompt history");
        }
    }
    session.console().line("Goodbye.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("finterm").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positional_commands_join_into_one_line() {
        let cli = parse(&["stocks", "load aapl", "options"]);
        assert_eq!(
            cli.initial_commands().unwrap(),
            vec!["stocks/load aapl/options"]
        );
        assert!(parse(&[]).initial_commands().unwrap().is_empty());
    }

    #[test]
    fn routine_file_supplies_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("morning.finterm");
        std::fs::write(&path, "# morning\nstocks\nload aapl\n").unwrap();

        let cli = parse(&["--file", path.to_str().unwrap()]);
        assert_eq!(cli.initial_commands().unwrap(), vec!["stocks", "load aapl"]);
    }

    #[test]
    fn missing_routine_file_is_an_error() {
        let cli = parse(&["--file", "/nonexistent/finterm/x.finterm"]);
        assert!(cli.initial_commands().is_err());
    }

    #[test]
    fn file_and_commands_conflict() {
        let result = Cli::try_parse_from(["finterm", "--file", "a.finterm", "stocks"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "use_completion = true\nexit_auto_help = true\n").unwrap();

        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--no-completion",
            "--remember-contexts",
            "--no-exit-help",
        ]);
        let flags = cli.feature_flags().unwrap();
        assert!(!flags.use_completion);
        assert!(flags.remember_contexts);
        assert!(!flags.exit_auto_help);
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
        assert_eq!(parse(&[]).verbose, 0);
    }
}
