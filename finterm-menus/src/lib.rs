//! The terminal's menus.
//!
//! ```text
//! /
//! ├── stocks/
//! │   └── options/
//! │       └── pricing/
//! └── crypto/
//! ```
//!
//! Each menu is a [`finterm_core::Menu`]: a command table, help status lines
//! and, where a menu holds loaded data, a reset sequence that rebuilds it.

pub mod crypto;
pub mod options;
pub mod pricing;
pub mod root;
pub mod stocks;

pub use crypto::CryptoMenu;
pub use options::OptionsMenu;
pub use pricing::PricingMenu;
pub use root::RootMenu;
pub use stocks::StocksMenu;

use chrono::NaiveDate;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// clap value parser for `YYYY-MM-DD` dates.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| format!("'{s}' is not a YYYY-MM-DD date"))
}

/// clap value parser for stock tickers: letters, digits, `.`, `-` and `^`,
/// normalized to uppercase.
pub(crate) fn parse_ticker(s: &str) -> Result<String, String> {
    let valid = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^'));
    if valid {
        Ok(s.to_ascii_uppercase())
    } else {
        Err(format!("'{s}' is not a valid ticker"))
    }
}

/// Placeholder for unset status values.
pub(crate) fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
