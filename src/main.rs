//! asegurar CLI
//!
//! # Usage
//!
//! ```bash
//! # Train against a CSV feed and promote if the challenger clears the gate
//! asegurar train --data data/feed.csv --schema config/schema.yaml
//!
//! # Score one record with the deployed model
//! asegurar predict --gender Male --age 44 --driving-license 1 \
//!     --region-code 28.0 --previously-insured 0 --vehicle-age "> 2 Years" \
//!     --vehicle-damage Yes --annual-premium 40454.0 \
//!     --policy-sales-channel 26.0 --vintage 217
//!
//! # Audit the registry
//! asegurar versions
//! ```

use asegurar::cli::{run_command, Cli};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
