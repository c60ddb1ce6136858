//! Checkout Example
//!
//! Loads a rule set and its baskets from the fixtures directory, prices each basket and prints
//! the total next to the expected value.
//!
//! Use `-f` to load a fixture set by name
//! Use `-b` to price a single basket
//! Use `-r` to print an itemised receipt for each basket

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tiered_checkout::{fixtures::Fixture, utils::ExampleCheckoutArgs};

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let args = ExampleCheckoutArgs::parse();

    init_logging(&args.log_level);

    let mut fixture = Fixture::with_base_path(&args.fixtures_dir);
    fixture
        .load_rules(&args.fixture)?
        .load_baskets(&args.fixture)?;

    let currency = fixture.rule_set()?.currency();

    let baskets = match args.basket.as_deref() {
        Some(name) => vec![fixture.basket(name)?],
        None => fixture.baskets().iter().collect(),
    };

    let stdout = io::stdout();

    for basket in baskets {
        let checkout = fixture.checkout(&basket.name)?;
        let total = checkout.total()?;
        let shown = total.to_string();

        match basket.expected_total(currency)? {
            Some(expected) if expected == total => {
                println!("{:<20} {shown:>10}  ok", basket.name);
            }
            Some(expected) => {
                println!("{:<20} {shown:>10}  expected {expected}", basket.name);
            }
            None => println!("{:<20} {shown:>10}", basket.name),
        }

        if args.receipt {
            checkout.receipt()?.write_to(stdout.lock())?;
        }
    }

    Ok(())
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}
