//! `/crypto/`: pick a coin and the currency it is quoted in.

use clap::Parser;
use finterm_core::{CommandTable, Menu, MenuContext};
use tracing::info;

use crate::or_dash;

pub const DEFAULT_VS: &str = "usd";

#[derive(Debug)]
pub struct CryptoMenu {
    coin: Option<String>,
    vs: String,
}

impl Default for CryptoMenu {
    fn default() -> Self {
        Self {
            coin: None,
            vs: DEFAULT_VS.to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "load", about = "Load a coin")]
struct LoadArgs {
    /// Coin id, e.g. bitcoin
    #[arg(value_parser = parse_coin)]
    coin: String,
    /// Quote currency
    #[arg(long, default_value = DEFAULT_VS, value_parser = parse_coin)]
    vs: String,
}

/// Coin and currency ids: letters, digits and `-`, normalized to lowercase.
fn parse_coin(s: &str) -> Result<String, String> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Ok(s.to_ascii_lowercase())
    } else {
        Err(format!("'{s}' is not a valid coin id"))
    }
}

impl CryptoMenu {
    pub fn coin(&self) -> Option<&str> {
        self.coin.as_deref()
    }

    pub fn vs(&self) -> &str {
        &self.vs
    }

    fn call_load(&mut self, args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(parsed) = cx.parse_args::<LoadArgs>("load", args) else {
            return Ok(());
        };
        info!(coin = %parsed.coin, vs = %parsed.vs, "loaded coin");
        cx.console()
            .line(format!("Loaded {} against {}", parsed.coin, parsed.vs));
        self.coin = Some(parsed.coin);
        self.vs = parsed.vs;
        Ok(())
    }

    fn call_show(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        for (label, value) in self.status() {
            cx.console().line(format!("{label}: {value}"));
        }
        Ok(())
    }
}

impl Menu for CryptoMenu {
    const PATH: &'static str = "/crypto/";

    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("load", "load a coin [--vs CURRENCY]", CryptoMenu::call_load)
            .command("show", "show the loaded coin", CryptoMenu::call_show)
    }

    fn status(&self) -> Vec<(&'static str, String)> {
        vec![("Coin", or_dash(self.coin.as_ref())), ("Vs", self.vs.clone())]
    }

    fn custom_reset(&self) -> Vec<String> {
        let Some(coin) = &self.coin else {
            return Vec::new();
        };
        let load = if self.vs == DEFAULT_VS {
            format!("load {coin}")
        } else {
            format!("load {coin} --vs {}", self.vs)
        };
        vec!["crypto".to_string(), load]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coins_are_lowercased() {
        assert_eq!(parse_coin("Bitcoin").unwrap(), "bitcoin");
        assert_eq!(parse_coin("shiba-inu").unwrap(), "shiba-inu");
        assert!(parse_coin("btc/usd").is_err());
    }

    #[test]
    fn reset_keeps_non_default_currency() {
        let mut menu = CryptoMenu::default();
        assert!(menu.custom_reset().is_empty());

        menu.coin = Some("bitcoin".into());
        assert_eq!(menu.custom_reset(), vec!["crypto", "load bitcoin"]);

        menu.vs = "eur".into();
        assert_eq!(menu.custom_reset(), vec!["crypto", "load bitcoin --vs eur"]);
    }
}
