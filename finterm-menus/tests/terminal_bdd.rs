//! BDD tests for the terminal's menus
//!
//! End-to-end scripted sessions from the root:
//! - Compound navigation with arguments
//! - Reset replay rebuilding loaded context
//! - Jumping to the option chain and landing in `/stocks/` on quit
//! - Remembered menus across home
//! - Argument errors reported without leaving the menu
//! - Single-letter typos dropped rather than corrected

use finterm_core::{Console, Controller, FeatureFlags, ScriptedPrompt, Session, SharedBuffer};
use finterm_menus::{CryptoMenu, OptionsMenu, PricingMenu, RootMenu, StocksMenu};

// ── Helpers ──────────────────────────────────────────────────────────

fn session(remember_contexts: bool, typed: &[&str]) -> (Session, SharedBuffer) {
    let flags = FeatureFlags {
        use_completion: false,
        remember_contexts,
        exit_auto_help: true,
        ..FeatureFlags::default()
    };
    let buffer = SharedBuffer::new();
    let session = Session::new(
        flags,
        Console::new(buffer.clone()),
        Box::new(ScriptedPrompt::new(typed.iter().copied())),
    );
    (session, buffer)
}

fn run(remember_contexts: bool, queued: &[&str], typed: &[&str]) -> (Session, String) {
    let (mut session, buffer) = session(remember_contexts, typed);

    let mut root = Controller::new(RootMenu, Vec::<String>::new()).unwrap();
    root.queue_mut().extend(queued.iter().map(|line| line.to_string()));
    root.menu(&mut session).unwrap();

    (session, buffer.contents())
}

// ── Navigation ───────────────────────────────────────────────────────

#[test]
fn bdd_compound_line_reaches_option_chain() {
    // GIVEN a compound line that loads a ticker and opens its options
    // WHEN the session runs until input ends
    let (session, out) = run(true, &["stocks/load aapl/options"], &[]);

    // THEN the options menu was opened for the uppercased ticker
    let options = session
        .registry()
        .get::<OptionsMenu>("/stocks/options/")
        .unwrap();
    assert_eq!(options.state().ticker(), "AAPL");
    assert!(out.contains("Loaded AAPL"));
    assert!(out.contains("/stocks/options/"));
}

#[test]
fn bdd_typo_at_root_enters_closest_menu() {
    let (session, out) = run(true, &["stokcs"], &[]);
    assert!(out.contains("Replacing by 'stocks'."));
    assert!(session.registry().contains("/stocks/"));
}

#[test]
fn bdd_single_letter_in_stocks_is_not_exit() {
    // GIVEN /stocks/ with a stray "e" queued ahead of real work
    let (mut session, buffer) = session(true, &[]);
    let mut stocks =
        Controller::new(StocksMenu::default(), vec!["e", "load aapl", "quit"]).unwrap();

    // WHEN the menu runs
    stocks.menu(&mut session).unwrap();

    // THEN "e" is dropped, the session stays open and the rest still runs
    let out = buffer.contents();
    assert!(out.contains("The command 'e' doesn't exist on the /stocks/ menu."));
    assert!(!out.contains("Replacing by"));
    assert!(!session.exit_requested());
    assert_eq!(stocks.state().loaded().unwrap().ticker, "AAPL");
}

#[test]
fn bdd_single_letter_at_root_is_not_home() {
    let (session, out) = run(true, &["o", "stocks/load aapl"], &[]);
    assert!(!out.contains("Replacing by"));
    let stocks = session.registry().get::<StocksMenu>("/stocks/").unwrap();
    assert_eq!(stocks.state().loaded().unwrap().ticker, "AAPL");
}

#[test]
fn bdd_options_without_ticker_is_refused() {
    let (session, out) = run(true, &["stocks/options"], &[]);
    assert!(out.contains("Use 'load <TICKER>' first."));
    assert!(!session.registry().contains("/stocks/options/"));
}

#[test]
fn bdd_options_jump_lands_in_stocks() {
    // GIVEN the root's options shortcut
    // WHEN the option chain is quit
    let (session, out) = run(true, &["options -t nvda", "show", "quit"], &[]);

    // THEN the user is in /stocks/ with the same ticker loaded
    assert!(out.contains("Ticker: NVDA"));
    let stocks = session.registry().get::<StocksMenu>("/stocks/").unwrap();
    assert_eq!(stocks.state().loaded().unwrap().ticker, "NVDA");
}

// ── Reset ────────────────────────────────────────────────────────────

#[test]
fn bdd_reset_replays_loaded_ticker() {
    // GIVEN a ticker loaded with a start date
    let (session, out) = run(true, &["stocks/load msft -s 2024-01-02", "reset"], &[]);

    // THEN reset reloaded it into a fresh /stocks/
    assert_eq!(out.matches("Loaded MSFT").count(), 2);
    let stocks = session.registry().get::<StocksMenu>("/stocks/").unwrap();
    let loaded = stocks.state().loaded().unwrap();
    assert_eq!(loaded.ticker, "MSFT");
    assert_eq!(loaded.load_command(), "load MSFT -s 2024-01-02");
}

#[test]
fn bdd_reset_in_options_keeps_loaded_period() {
    // GIVEN the option chain of a ticker loaded over a period
    // WHEN it is reset
    let (session, out) = run(
        true,
        &["stocks/load msft -s 2024-01-02 -e 2024-06-28/options", "reset"],
        &[],
    );

    // THEN the replay reloads the same period, not the whole history
    assert_eq!(out.matches("Loaded MSFT").count(), 2);
    let stocks = session.registry().get::<StocksMenu>("/stocks/").unwrap();
    assert_eq!(
        stocks.state().loaded().unwrap().load_command(),
        "load MSFT -s 2024-01-02 -e 2024-06-28"
    );
    let options = session
        .registry()
        .get::<OptionsMenu>("/stocks/options/")
        .unwrap();
    assert_eq!(options.state().loaded(), stocks.state().loaded().unwrap());
}

#[test]
fn bdd_reset_in_pricing_rebuilds_chain_without_prices() {
    let (session, out) = run(
        true,
        &[
            "stocks/load aapl/options/exp 2025-01-17/pricing/add -p 100 -c 0.5",
            "reset",
        ],
        &[],
    );

    assert_eq!(out.matches("Expiry set to 2025-01-17").count(), 2);
    let pricing = session
        .registry()
        .get::<PricingMenu>("/stocks/options/pricing/")
        .unwrap();
    assert!(pricing.state().points().is_empty());
}

#[test]
fn bdd_reset_at_root_forgets_menus() {
    let (session, _) = run(true, &["crypto/load bitcoin", "home", "reset"], &[]);
    assert!(session.registry().is_empty());
}

// ── Remember contexts ────────────────────────────────────────────────

#[test]
fn bdd_remembered_crypto_survives_home() {
    let (session, out) = run(
        true,
        &["crypto/load Bitcoin --vs EUR", "home", "crypto", "show"],
        &[],
    );
    assert!(out.contains("Coin: bitcoin"));
    let crypto = session.registry().get::<CryptoMenu>("/crypto/").unwrap();
    assert_eq!(crypto.state().vs(), "eur");
}

#[test]
fn bdd_forgotten_crypto_starts_empty() {
    let (_, out) = run(
        false,
        &["crypto/load bitcoin", "home", "crypto", "show"],
        &[],
    );
    assert!(out.contains("Coin: -"));
}

// ── Arguments ────────────────────────────────────────────────────────

#[test]
fn bdd_bad_date_is_reported_and_nothing_loads() {
    let (session, out) = run(true, &["stocks/load aapl -s 2024-13-01"], &[]);
    assert!(out.contains("is not a YYYY-MM-DD date"));
    let stocks = session.registry().get::<StocksMenu>("/stocks/").unwrap();
    assert!(stocks.state().loaded().is_none());
}

#[test]
fn bdd_reversed_period_is_an_error() {
    let (_, out) = run(
        true,
        &["stocks/load aapl -s 2024-06-01 -e 2024-01-01"],
        &[],
    );
    assert!(out.contains("/stocks/ load: start date 2024-06-01 is after end date 2024-01-01"));
}

#[test]
fn bdd_pricing_table_from_typed_commands() {
    // GIVEN a user typing into the pricing menu
    let (_, out) = run(
        false,
        &["stocks/load aapl/options/exp 2025-01-17/pricing"],
        &["add -p 180 -c 0.4", "add -p 200 -c 0.6", "show", "rmv -p 999"],
    );

    // THEN the table lists both prices and the missing one is reported
    assert!(out.contains("    180.00    0.40"));
    assert!(out.contains("    200.00    0.60"));
    assert!(out.contains("     Total    1.00"));
    assert!(!out.contains("Probabilities do not add up to 1."));
    assert!(out.contains("rmv: price 999.00 is not in the table"));
}

#[test]
fn bdd_exit_from_deep_menu_ends_session() {
    let (session, _) = run(
        false,
        &["stocks/load aapl/options/exp 2025-01-17/pricing", "exit", "crypto"],
        &[],
    );
    assert!(session.exit_requested());
    assert!(session.registry().is_empty());
}
