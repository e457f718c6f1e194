//! ariacrawl CLI — machine-readable ARIA semantics from the W3C specs.
//!
//! Fetches HTML-ARIA and WAI-ARIA 1.1 (through an on-disk cache), extracts
//! roles, states, properties, and value types, and prints one JSON document.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
