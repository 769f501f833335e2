// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vigil - encrypted credential vault and link risk checker.
//!
//! This is the binary entry point.

mod check;
mod generate;
mod vault;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vigil_assess::RedFlag;
use vigil_config::VigilConfig;
use vigil_core::VigilError;

/// Vigil - encrypted credential vault and link risk checker.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the encrypted credential vault.
    #[command(subcommand)]
    Vault(VaultCommand),
    /// Assess the risk of a link.
    Check(CheckArgs),
    /// List the red-flag questions accepted by `check --red-flag`.
    Questions,
    /// Generate a random password.
    Generate(GenerateArgs),
}

/// `vigil vault` subcommands.
#[derive(Subcommand, Debug)]
enum VaultCommand {
    /// Set the master password for a new vault.
    Init,
    /// Check the master password.
    Unlock,
    /// Store a new credential.
    Add {
        #[arg(long)]
        service: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        password: PasswordSource,
    },
    /// List stored credentials with masked passwords.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one credential including its password.
    Show { id: String },
    /// Replace fields of a credential. Omitted fields are kept.
    Update {
        id: String,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Prompt for (or read) a new password instead of keeping the current one.
        #[arg(long)]
        new_password: bool,
        #[command(flatten)]
        password: PasswordSource,
    },
    /// Delete a credential.
    Delete { id: String },
    /// Delete the master password and every stored credential.
    Reset {
        /// Confirm the irreversible reset.
        #[arg(long)]
        yes: bool,
    },
}

/// Where a credential password comes from. Defaults to a TTY prompt.
#[derive(Args, Debug, Clone)]
struct PasswordSource {
    /// Read the password from the first line of stdin.
    #[arg(long, conflicts_with = "generate")]
    password_stdin: bool,
    /// Generate a random password.
    #[arg(long)]
    generate: bool,
    /// Length of a generated password.
    #[arg(long, default_value_t = 20, requires = "generate")]
    length: usize,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// The link to assess.
    url: String,
    /// A red flag answered "yes" (repeatable). See `vigil questions`.
    #[arg(long = "red-flag", value_name = "FLAG")]
    red_flags: Vec<RedFlag>,
    /// Do not consult the remote classifier.
    #[arg(long)]
    offline: bool,
    /// Output as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, default_value_t = 16)]
    length: usize,
    #[arg(long)]
    no_lowercase: bool,
    #[arg(long)]
    no_uppercase: bool,
    #[arg(long)]
    no_digits: bool,
    #[arg(long)]
    no_symbols: bool,
}

fn load_config(path: Option<&std::path::Path>) -> VigilConfig {
    let result = match path {
        Some(path) => vigil_config::load_and_validate_path(path),
        None => vigil_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            vigil_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vigil={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: VigilConfig) -> Result<(), VigilError> {
    match cli.command {
        Commands::Vault(command) => vault::run_vault(&config, command),
        Commands::Check(args) => check::run_check(&config, args).await,
        Commands::Questions => {
            for flag in RedFlag::all() {
                println!("{flag:<24} {}", flag.question());
            }
            Ok(())
        }
        Commands::Generate(args) => generate::run_generate(&args),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    init_tracing(&config.logging.level);

    if let Err(e) = run(cli, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
