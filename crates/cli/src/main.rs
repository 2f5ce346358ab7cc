//! EdGPT CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (including the session table)
//! edgpt-cli migrate
//!
//! # Create a customer account (password from EDGPT_USER_PASSWORD)
//! edgpt-cli user create -e owner@lawfirm.com -b "Smith & Co"
//!
//! # Create an admin account
//! edgpt-cli user create -e ops@edgpt.ai --admin
//!
//! # List registered domains
//! edgpt-cli domains
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "edgpt-cli")]
#[command(author, version, about = "EdGPT platform CLI tools")]
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
    /// List registered domains and their landing templates
    Domains,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Business name
        #[arg(short, long)]
        business_name: Option<String>,

        /// Grant access to the admin dashboard
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                business_name,
                admin,
            } => {
                commands::user::create(&email, business_name, admin).await?;
            }
        },
        Commands::Domains => commands::domains::list(),
    }
    Ok(())
}
