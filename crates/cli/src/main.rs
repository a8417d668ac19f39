//! Petal CLI - Operator tools for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Hash a password for ADMIN_PASSWORD_HASH / CUSTOMER_PASSWORD_HASH
//! petal-cli hash-password 'correct horse battery staple'
//! echo -n 'correct horse battery staple' | petal-cli hash-password
//!
//! # Generate a STOREFRONT_SESSION_SECRET
//! petal-cli gen-secret --length 64
//!
//! # Print the default catalog as JSON
//! petal-cli seed-catalog > catalog.json
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "petal-cli")]
#[command(author, version, about = "Petal storefront operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an Argon2id hash of a password
    HashPassword {
        /// Password to hash; read from stdin when omitted
        password: Option<String>,
    },
    /// Print a random alphanumeric session secret
    GenSecret {
        /// Secret length in characters
        #[arg(short, long, default_value_t = commands::secret::DEFAULT_LENGTH)]
        length: usize,
    },
    /// Print the default catalog as JSON
    SeedCatalog,
}

fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::HashPassword { password } => commands::password::hash(password)?,
        Commands::GenSecret { length } => commands::secret::generate(length)?,
        Commands::SeedCatalog => commands::catalog::print()?,
    }
    Ok(())
}
