//! Catalog CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! catalog-cli migrate
//!
//! # Create a customer account
//! catalog-cli user create-customer -u jane -e jane@example.com -p 'correct horse'
//! ```
//!
//! Both commands read `DATABASE_URL` (and `.env`) the same way the API does.

#![cfg_attr(not(test), forbid(unsafe_code))]

use catalog_core::Email;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog backend CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a customer account
    CreateCustomer {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: Email,

        /// Plain-text password; hashed before it is stored
        #[arg(short, long)]
        password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::CreateCustomer {
                username,
                email,
                password,
                first_name,
                last_name,
            } => {
                commands::user::create_customer(commands::user::NewCustomer {
                    username,
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            }
        },
    }
    Ok(())
}
