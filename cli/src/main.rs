//! `certctl`: command-line client for the certificate ledger API.
//!
//! ```text
//! certctl issue "Jane Doe, MSc Computer Science, 2024"
//! certctl verify "Jane Doe, MSc Computer Science, 2024"
//! certctl --base-url http://ledger:5000 chain
//! ```
//!
//! Prints `status=<code>` followed by the pretty-printed JSON body.

mod client;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use client::{ApiClient, ApiResponse, DEFAULT_TIMEOUT};

#[derive(Parser)]
#[command(name = "certctl")]
#[command(about = "Shell CLI for certificate issue/verify actions", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue a certificate
    Issue {
        /// Certificate text
        certificate: String,
    },
    /// Verify a certificate
    Verify {
        /// Certificate text
        certificate: String,
    },
    /// Show blockchain state
    Chain,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match ApiClient::new(&cli.base_url, DEFAULT_TIMEOUT) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let response = match &cli.command {
        Command::Issue { certificate } => client.issue(certificate),
        Command::Verify { certificate } => client.verify(certificate),
        Command::Chain => client.chain(),
    };

    print_response(&response);
}

fn print_response(response: &ApiResponse) {
    println!("status={}", response.status);
    match serde_json::to_string_pretty(&response.body) {
        Ok(pretty) => println!("{pretty}"),
        Err(_) => println!("{}", response.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands_and_base_url() {
        let cli = Cli::try_parse_from(["certctl", "issue", "Jane Doe"]).unwrap();
        assert_eq!(cli.base_url, "http://127.0.0.1:5000");
        assert!(matches!(cli.command, Command::Issue { ref certificate } if certificate == "Jane Doe"));

        let cli =
            Cli::try_parse_from(["certctl", "--base-url", "http://ledger:5000", "chain"]).unwrap();
        assert_eq!(cli.base_url, "http://ledger:5000");
        assert!(matches!(cli.command, Command::Chain));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["certctl"]).is_err());
        assert!(Cli::try_parse_from(["certctl", "verify"]).is_err());
    }
}
