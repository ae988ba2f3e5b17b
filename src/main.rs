//! ATM reconciliation CLI
//!
//! Reads one or more transaction CSV files and writes one reconciled CSV per
//! input into the output directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- january.csv february.csv
//! cargo run -- --exact -o results transactions.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use atm_reconcile::batch;
use atm_reconcile::config::{Cli, Config};
use clap::Parser;
use std::process;

fn main() {
    env_logger::init();

    let config = Config::from(Cli::parse());

    let summary = batch::run(&config);
    for (input, reason) in &summary.failed {
        eprintln!("Error: Unable to process file {}: {}", input.display(), reason);
    }

    if !summary.all_succeeded() {
        process::exit(1);
    }
}
