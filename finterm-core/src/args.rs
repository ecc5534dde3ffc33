//! Per-command argument parsing with clap.

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

use crate::console::Console;

/// Parse `args` as the arguments of `command`.
///
/// Usage text (`-h`) and argument errors are printed to `console`; both
/// return `None` so the handler can simply stop.
pub fn parse_args<T: Parser>(command: &str, args: &[String], console: &mut Console) -> Option<T> {
    let argv = std::iter::once(command).chain(args.iter().map(String::as_str));
    match T::try_parse_from(argv) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {}
                kind => debug!(command, ?kind, "invalid command arguments"),
            }
            console.text(err.render());
            None
        }
    }
}
