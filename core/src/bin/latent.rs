//! Latent CLI
//!
//! Drives the sample resumable call from a tokio loop, runs its blocking
//! counterpart, or prints the effective configuration.

use latent_core::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run_cli().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
