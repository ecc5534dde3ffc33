//! Command-line parsing: universal commands, aliases and compound input.

use crate::path::SEPARATOR;

/// Tokens that, at the head of a queue, make the current menu return.
pub const QUIT_TOKENS: [&str; 3] = ["q", "..", "quit"];

/// Marker queued by `reset` so the root knows a replay follows.
pub const RESET_SENTINEL: &str = "reset";

/// Commands every menu understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Cls,
    Home,
    Help,
    Quit,
    Exit,
    Reset,
    Record,
    Stop,
}

impl Builtin {
    pub const ALL: [Builtin; 8] = [
        Builtin::Cls,
        Builtin::Home,
        Builtin::Help,
        Builtin::Quit,
        Builtin::Exit,
        Builtin::Reset,
        Builtin::Record,
        Builtin::Stop,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cls => "cls",
            Builtin::Home => "home",
            Builtin::Help => "help",
            Builtin::Quit => "quit",
            Builtin::Exit => "exit",
            Builtin::Reset => "reset",
            Builtin::Record => "record",
            Builtin::Stop => "stop",
        }
    }

    /// Short aliases accepted in place of the canonical name.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Builtin::Help => &["h", "?"],
            Builtin::Quit => &["q", ".."],
            Builtin::Reset => &["r"],
            _ => &[],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Builtin::Cls => "clear the screen",
            Builtin::Home => "go back to the root menu",
            Builtin::Help => "show this menu",
            Builtin::Quit => "go back one menu",
            Builtin::Exit => "leave the terminal",
            Builtin::Reset => "rebuild this menu and replay its context",
            Builtin::Record => "start recording typed commands into a routine",
            Builtin::Stop => "stop recording and save the routine",
        }
    }

    /// Resolve an already-normalized command token.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Every token, canonical or alias, that resolves to a builtin.
    pub fn all_tokens() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .flat_map(|b| std::iter::once(b.name()).chain(b.aliases().iter().copied()))
    }
}

/// Map short aliases onto canonical command names; anything else is unchanged.
pub fn normalize(token: &str) -> &str {
    match token {
        ".." | "q" => "quit",
        "?" | "h" => "help",
        "r" => "reset",
        other => other,
    }
}

/// True for `q`, `..` and `quit`.
pub fn is_quit_token(command: &str) -> bool {
    QUIT_TOKENS.contains(&command)
}

/// A single command line split into its command token and argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split on whitespace. `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().map(String::from);
        let name = tokens.next()?;
        Some(Self {
            name,
            args: tokens.collect(),
        })
    }
}

/// Split `/`-joined input into the commands it stands for, in execution order.
///
/// A leading separator means "start from the root", so an empty first segment
/// becomes `home`. Other empty segments are dropped.
pub fn split_compound(line: &str) -> Vec<String> {
    let mut segments = line.split(SEPARATOR);
    let mut commands = Vec::new();
    match segments.next().map(str::trim) {
        Some("") | None => commands.push(Builtin::Home.name().to_string()),
        Some(first) => commands.push(first.to_string()),
    }
    commands.extend(
        segments
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
    );
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_normalize() {
        assert_eq!(normalize("q"), "quit");
        assert_eq!(normalize(".."), "quit");
        assert_eq!(normalize("?"), "help");
        assert_eq!(normalize("h"), "help");
        assert_eq!(normalize("r"), "reset");
        assert_eq!(normalize("load"), "load");
    }

    #[test]
    fn builtin_tokens_cover_aliases() {
        let tokens: Vec<&str> = Builtin::all_tokens().collect();
        for alias in ["q", "..", "h", "?", "r", "cls", "exit", "stop"] {
            assert!(tokens.contains(&alias), "missing {alias}");
        }
        for token in tokens {
            assert!(Builtin::from_name(normalize(token)).is_some());
        }
    }

    #[test]
    fn parse_command_line() {
        let cmd = CommandLine::parse("  load  AAPL -s 2020-01-01 ").unwrap();
        assert_eq!(cmd.name, "load");
        assert_eq!(cmd.args, vec!["AAPL", "-s", "2020-01-01"]);
        assert!(CommandLine::parse("   ").is_none());
    }

    #[test]
    fn split_relative() {
        assert_eq!(
            split_compound("stocks/load TSLA"),
            vec!["stocks", "load TSLA"]
        );
    }

    #[test]
    fn split_absolute() {
        assert_eq!(
            split_compound("/stocks/options/"),
            vec!["home", "stocks", "options"]
        );
    }

    #[test]
    fn split_drops_inner_empty_segments() {
        assert_eq!(split_compound("stocks//load gme"), vec!["stocks", "load gme"]);
    }
}
