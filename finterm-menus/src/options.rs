//! `/stocks/options/`: pick an expiry for the ticker it was opened with.
//! The ticker keeps its loaded period so a reset reloads the same data.

use chrono::NaiveDate;
use clap::Parser;
use finterm_core::{CommandTable, Menu, MenuContext};
use tracing::info;

use crate::pricing::PricingMenu;
use crate::stocks::LoadedTicker;
use crate::{or_dash, parse_date, DATE_FORMAT};

#[derive(Debug)]
pub struct OptionsMenu {
    loaded: LoadedTicker,
    expiry: Option<NaiveDate>,
}

#[derive(Debug, Parser)]
#[command(name = "exp", about = "Select an expiry date")]
struct ExpArgs {
    /// Expiry (YYYY-MM-DD)
    #[arg(value_parser = parse_date)]
    date: NaiveDate,
}

impl OptionsMenu {
    pub fn new(loaded: LoadedTicker) -> Self {
        Self {
            loaded,
            expiry: None,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.loaded.ticker
    }

    pub fn loaded(&self) -> &LoadedTicker {
        &self.loaded
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry
    }

    fn call_exp(&mut self, args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(parsed) = cx.parse_args::<ExpArgs>("exp", args) else {
            return Ok(());
        };
        info!(ticker = %self.loaded.ticker, expiry = %parsed.date, "selected expiry");
        cx.console().line(format!(
            "Expiry set to {}",
            parsed.date.format(DATE_FORMAT)
        ));
        self.expiry = Some(parsed.date);
        Ok(())
    }

    fn call_pricing(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(expiry) = self.expiry else {
            cx.console().line("Select an expiry with 'exp <YYYY-MM-DD>' first.");
            return Ok(());
        };
        cx.enter_fresh(PricingMenu::new(self.loaded.clone(), expiry))?;
        Ok(())
    }

    fn call_show(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        for (label, value) in self.status() {
            cx.console().line(format!("{label}: {value}"));
        }
        Ok(())
    }
}

impl Menu for OptionsMenu {
    const PATH: &'static str = "/stocks/options/";

    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("exp", "select an expiry date", OptionsMenu::call_exp)
            .submenu("pricing", "price probabilities for the expiry", OptionsMenu::call_pricing)
            .command("show", "show ticker and expiry", OptionsMenu::call_show)
    }

    fn status(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Ticker", self.loaded.ticker.clone()),
            ("Expiry", or_dash(self.expiry)),
        ]
    }

    fn custom_reset(&self) -> Vec<String> {
        let mut replay = vec![
            "stocks".to_string(),
            self.loaded.load_command(),
            "options".to_string(),
        ];
        if let Some(expiry) = self.expiry {
            replay.push(format!("exp {}", expiry.format(DATE_FORMAT)));
        }
        replay
    }
}
