//! StoreForge CLI - migrations, ad-hoc provisioning, and cron batches.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! storeforge migrate
//!
//! # Provision a store directly from credentials (no session required)
//! storeforge provision --shop my-store.myshopify.com --token shpat_... --niche pets
//!
//! # Run the daily automation batch (what an external cron invokes)
//! storeforge automation run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `provision` - Generate and upload a catalog to one store
//! - `automation run` - Run the daily batch over all eligible sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "storeforge")]
#[command(author, version, about = "StoreForge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Provision a single store from explicit credentials
    Provision {
        /// Store domain (e.g., my-store.myshopify.com)
        #[arg(long)]
        shop: String,

        /// Admin API access token
        #[arg(long)]
        token: String,

        /// Niche to generate products for
        #[arg(long)]
        niche: String,

        /// Number of products to generate
        #[arg(long, default_value_t = 10)]
        count: usize,

        /// Brand color applied to copy and theme settings
        #[arg(long, default_value = "#2563eb")]
        color: String,

        /// Skip the theme/branding pass
        #[arg(long, default_value_t = false)]
        skip_branding: bool,
    },
    /// Automation batch commands
    Automation {
        #[command(subcommand)]
        action: AutomationAction,
    },
}

#[derive(Subcommand)]
enum AutomationAction {
    /// Run the batch once (cron entry point)
    Run,
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
        Commands::Provision {
            shop,
            token,
            niche,
            count,
            color,
            skip_branding,
        } => {
            commands::provision::run(&shop, &token, &niche, count, &color, skip_branding).await?;
        }
        Commands::Automation { action } => match action {
            AutomationAction::Run => commands::automation::run().await?,
        },
    }
    Ok(())
}
