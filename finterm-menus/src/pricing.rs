//! `/stocks/options/pricing/`: a table of expected prices and their
//! probabilities at expiry.

use anyhow::bail;
use chrono::NaiveDate;
use clap::Parser;
use finterm_core::{CommandTable, Menu, MenuContext};
use tracing::info;

use crate::stocks::LoadedTicker;
use crate::DATE_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub chance: f64,
}

#[derive(Debug)]
pub struct PricingMenu {
    loaded: LoadedTicker,
    expiry: NaiveDate,
    points: Vec<PricePoint>,
}

#[derive(Debug, Parser)]
#[command(name = "add", about = "Add or replace an expected price")]
struct AddArgs {
    /// Expected price
    #[arg(short, long)]
    price: f64,
    /// Probability of the price, between 0 and 1
    #[arg(short, long, value_parser = parse_chance)]
    chance: f64,
}

#[derive(Debug, Parser)]
#[command(name = "rmv", about = "Remove expected prices")]
struct RmvArgs {
    /// Price to remove
    #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
    price: Option<f64>,
    /// Remove every price
    #[arg(short, long)]
    all: bool,
}

fn parse_chance(s: &str) -> Result<f64, String> {
    let chance: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&chance) {
        Ok(chance)
    } else {
        Err(format!("{chance} is not between 0 and 1"))
    }
}

impl PricingMenu {
    pub fn new(loaded: LoadedTicker, expiry: NaiveDate) -> Self {
        Self {
            loaded,
            expiry,
            points: Vec::new(),
        }
    }

    /// Price points, sorted by price.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Sum of the probabilities entered so far.
    pub fn total_chance(&self) -> f64 {
        self.points.iter().map(|p| p.chance).sum()
    }

    fn add(&mut self, point: PricePoint) {
        match self.points.iter_mut().find(|p| p.price == point.price) {
            Some(existing) => existing.chance = point.chance,
            None => {
                self.points.push(point);
                self.points.sort_by(|a, b| a.price.total_cmp(&b.price));
            }
        }
    }

    fn call_add(&mut self, args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(parsed) = cx.parse_args::<AddArgs>("add", args) else {
            return Ok(());
        };
        if parsed.price < 0.0 {
            bail!("price {} is negative", parsed.price);
        }
        self.add(PricePoint {
            price: parsed.price,
            chance: parsed.chance,
        });
        info!(price = parsed.price, chance = parsed.chance, "price point added");
        cx.console().line(format!(
            "Price {:.2} added with probability {:.2}",
            parsed.price, parsed.chance
        ));
        Ok(())
    }

    fn call_rmv(&mut self, args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let Some(parsed) = cx.parse_args::<RmvArgs>("rmv", args) else {
            return Ok(());
        };
        if parsed.all {
            self.points.clear();
            cx.console().line("All prices removed");
            return Ok(());
        }
        let Some(price) = parsed.price else {
            return Ok(());
        };
        let before = self.points.len();
        self.points.retain(|p| p.price != price);
        if self.points.len() == before {
            bail!("price {price:.2} is not in the table");
        }
        cx.console().line(format!("Price {price:.2} removed"));
        Ok(())
    }

    fn call_show(&mut self, _args: &[String], cx: &mut MenuContext<'_>) -> anyhow::Result<()> {
        let console = cx.console();
        console.line(format!(
            "{} expiring {}",
            self.loaded.ticker,
            self.expiry.format(DATE_FORMAT)
        ));
        if self.points.is_empty() {
            console.line("No prices yet. Use 'add -p PRICE -c CHANCE'.");
            return Ok(());
        }
        console.line(format!("{:>10}  {:>6}", "Price", "Chance"));
        for point in &self.points {
            console.line(format!("{:>10.2}  {:>6.2}", point.price, point.chance));
        }
        let total = self.total_chance();
        console.line(format!("{:>10}  {total:>6.2}", "Total"));
        if (total - 1.0).abs() > 1e-9 {
            console.line("Probabilities do not add up to 1.");
        }
        Ok(())
    }
}

impl Menu for PricingMenu {
    const PATH: &'static str = "/stocks/options/pricing/";

    fn commands() -> CommandTable<Self> {
        CommandTable::new()
            .command("add", "add a price -p and its probability -c", PricingMenu::call_add)
            .command("rmv", "remove a price -p, or all with -a", PricingMenu::call_rmv)
            .command("show", "show the price table", PricingMenu::call_show)
    }

    fn status(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Ticker", self.loaded.ticker.clone()),
            ("Expiry", self.expiry.format(DATE_FORMAT).to_string()),
            ("Prices", self.points.len().to_string()),
        ]
    }

    fn custom_reset(&self) -> Vec<String> {
        vec![
            "stocks".to_string(),
            self.loaded.load_command(),
            "options".to_string(),
            format!("exp {}", self.expiry.format(DATE_FORMAT)),
            "pricing".to_string(),
        ]
    }
}
