//! Help screen rendering.

use std::fmt::Write;

use crate::command::Builtin;
use crate::controller::{CommandKind, CommandTable};
use crate::path::MenuPath;

/// Render a menu's help screen: its path, optional status lines, its own
/// commands (submenus marked `>`), then the universal commands with
/// their aliases.
pub fn render<M>(path: &MenuPath, status: &[(&str, String)], commands: &CommandTable<M>) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{path}");

    if !status.is_empty() {
        let _ = writeln!(out);
        for (label, value) in status {
            let _ = writeln!(out, "{:<12} {value}", format!("{label}:"));
        }
    }

    if !commands.is_empty() {
        let _ = writeln!(out);
        for spec in commands.iter() {
            let marker = match spec.kind {
                CommandKind::Submenu => '>',
                CommandKind::Action => ' ',
            };
            let _ = writeln!(out, "{marker}   {:<12} {}", spec.name, spec.description);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Universal:");
    for builtin in Builtin::ALL {
        let label = match builtin.aliases() {
            [] => builtin.name().to_string(),
            aliases => format!("{} ({})", builtin.name(), aliases.join(", ")),
        };
        let _ = writeln!(out, "    {label:<16} {}", builtin.description());
    }
    out
}
