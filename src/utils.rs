//! Utils

use clap::Parser;

/// Arguments for the checkout example
#[derive(Debug, Parser)]
pub struct ExampleCheckoutArgs {
    /// Fixture set to load rules and baskets from
    #[clap(short, long, default_value = "example")]
    pub fixture: String,

    /// Only price the basket with this name
    #[clap(short, long)]
    pub basket: Option<String>,

    /// Directory containing the `rules` and `baskets` fixture directories
    #[clap(short = 'd', long, default_value = "./fixtures")]
    pub fixtures_dir: String,

    /// Print an itemised receipt for each basket
    #[clap(short, long)]
    pub receipt: bool,

    /// Log level (trace, debug, info, warn, error)
    #[clap(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}
