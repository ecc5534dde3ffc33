//! `/stocks/`: pick a ticker and a period.

use anyhow::bail;
use chrono::NaiveDate;
use clap::Parser;
use finterm_core::{CommandTable, Menu, MenuContext};
use tracing::info;

use crate::options::OptionsMenu;
use crate::{or_dash, parse_date, parse_ticker, DATE_FORMAT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTicker {
    pub ticker: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl LoadedTicker {
    /// The `load` line that recreates this selection.
    pub fn load_command(&self) -> String {
        let mut line = format!("load {}", self.ticker);
        if let Some(start) = self.start {
            line.push_str(&format!(" -s {}", start.format(DATE_FORMAT)));
        }
        if let Some(end) = self.end {
            line.push_str(&format!(" -e {}", end.format(DATE_FORMAT)));
        }
        line
    }
}

#[derive(Debug, Default)]
pub struct StocksMenu {
    loaded: Option<LoadedTicker>,
}

#[derive(Debug, Parser)]
#[command(name = "load", about = "Load a stock ticker")]
struct LoadArgs {
    /// Stock ticker, e.g. AAPL
    #[arg(value_parser = parse_ticker)]
    ticker: String,
    /// First day of the period (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    start: Option<NaiveDate>,
    /// Last day of the period (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    end: Option<NaiveDate>,
}

impl StocksMenu {
    pub fn loaded(&self) -> Option<&LoadedTicker> {
        self.loaded.as_ref()
    }

    fn call_load(&mut self, args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(parsed) = cx.parse_args::<LoadArgs>("load", args) else {
            return Ok(());
        };
        if let (Some(start), Some(end)) = (parsed.start, parsed.end) {
            if start > end {
                bail!("start date {start} is after end date {end}");
            }
        }
        info!(ticker = %parsed.ticker, "loaded ticker");
        cx.console().line(format!("Loaded {}", parsed.ticker));
        self.loaded = Some(LoadedTicker {
            ticker: parsed.ticker,
            start: parsed.start,
            end: parsed.end,
        });
        Ok(())
    }

    fn call_options(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(loaded) = &self.loaded else {
            cx.console().line("Use 'load <TICKER>' first.");
            return Ok(());
        };
        cx.enter_fresh(OptionsMenu::new(loaded.clone()))?;
        Ok(())
    }

    fn call_show(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        for (label, value) in self.status() {
            cx.console().line(format!("{label}: {value}"));
        }
        Ok(())
    }
}

impl Menu for StocksMenu {
    const PATH: &'static str = "/stocks/";

    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("load", "load a ticker [-s START] [-e END]", StocksMenu::call_load)
            .submenu("options", "option chain of the loaded ticker", StocksMenu::call_options)
            .command("show", "show the loaded ticker", StocksMenu::call_show)
    }

    fn status(&self) -> Vec<(&'static str, String)> {
        let loaded = self.loaded.as_ref();
        vec![
            ("Ticker", or_dash(loaded.map(|l| &l.ticker))),
            ("Start", or_dash(loaded.and_then(|l| l.start))),
            ("End", or_dash(loaded.and_then(|l| l.end))),
        ]
    }

    fn custom_reset(&self) -> Vec<String> {
        match &self.loaded {
            Some(loaded) => vec!["stocks".to_string(), loaded.load_command()],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_replays_load_with_period() {
        let menu = StocksMenu {
            loaded: Some(LoadedTicker {
                ticker: "AAPL".into(),
                start: NaiveDate::from_ymd_opt(2024, 1, 2),
                end: None,
            }),
        };
        assert_eq!(menu.custom_reset(), vec!["stocks", "load AAPL -s 2024-01-02"]);
    }

    #[test]
    fn nothing_loaded_resets_along_path() {
        assert!(StocksMenu::default().custom_reset().is_empty());
    }

    #[test]
    fn status_shows_dashes_when_empty() {
        let status = StocksMenu::default().status();
        assert_eq!(status[0], ("Ticker", "-".to_string()));
    }
}
