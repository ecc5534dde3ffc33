//! The application root, `/`.

use clap::Parser;
use finterm_core::{CommandTable, Menu, MenuContext};
use tracing::info;

use crate::crypto::CryptoMenu;
use crate::options::OptionsMenu;
use crate::parse_ticker;
use crate::stocks::{LoadedTicker, StocksMenu};

#[derive(Debug, Default)]
pub struct RootMenu;

#[derive(Debug, Parser)]
#[command(name = "options", about = "Jump straight to a ticker's option chain")]
struct OptionsArgs {
    /// Stock ticker
    #[arg(short, long, value_parser = parse_ticker)]
    ticker: String,
}

impl Menu for RootMenu {
    const PATH: &'static str = "/";

    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .submenu("stocks", "stock prices and options", RootMenu::call_stocks)
            .submenu("crypto", "crypto asset prices", RootMenu::call_crypto)
            .submenu("options", "option chain for a ticker (-t)", RootMenu::call_options)
    }
}

impl RootMenu {
    fn call_stocks(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        cx.enter(StocksMenu::default)?;
        Ok(())
    }

    fn call_crypto(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        cx.enter(CryptoMenu::default)?;
        Ok(())
    }

    /// Open `/stocks/options/` directly. Quitting it lands in `/stocks/`
    /// with the ticker loaded.
    fn call_options(&mut self, args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(parsed) = cx.parse_args::<OptionsArgs>("options", args) else {
            return Ok(());
        };
        info!(ticker = %parsed.ticker, "jumping to options");
        let loaded = LoadedTicker {
            ticker: parsed.ticker,
            start: None,
            end: None,
        };
        let above = format!("stocks/{}", loaded.load_command());
        cx.enter_fresh_from(OptionsMenu::new(loaded), &above)?;
        Ok(())
    }
}
