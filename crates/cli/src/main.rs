//! Zafra CLI - Operator tools for the Zafra storefront.
//!
//! # Usage
//!
//! ```bash
//! # Check a session token the way the storefront gate would
//! zafra token inspect <TOKEN>
//!
//! # List the seed catalog
//! zafra catalog list --category luxury
//! zafra catalog list --featured
//!
//! # Price a cart: two of product 1, one of product 4
//! zafra cart quote 1:2 4
//!
//! # Register an account with the admin backend
//! zafra admin register -e ana@example.com -n "Ana Ruiz" -r manager
//! ```
//!
//! # Commands
//!
//! - `token inspect` - Run the session gate on a token
//! - `catalog list` - Print catalog products as JSON
//! - `cart quote` - Print an order summary for a set of items
//! - `admin register` - Validate and register a new account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use url::Url;
use zafra_storefront::config::DEFAULT_ADMIN_API_URL;

mod commands;

#[derive(Parser)]
#[command(name = "zafra")]
#[command(author, version, about = "Zafra storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect session tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Browse the seed catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Price carts
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage admin backend accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Run the session gate on a token and print the verdict
    Inspect {
        /// Bearer token as issued by the admin backend
        token: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only products in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Only the featured products
        #[arg(short, long, conflicts_with = "category")]
        featured: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Build a cart and print its order summary
    Quote {
        /// Items as `ID` or `ID:QTY`
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Register a new account
    Register {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account role (`user`, `admin`, `manager`)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Account password
        #[arg(short, long, env = "ZAFRA_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Admin backend base URL
        #[arg(long, env = "ADMIN_API_URL", default_value = DEFAULT_ADMIN_API_URL)]
        admin_url: Url,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr; command output goes to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "zafra=info,zafra_storefront=info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Token { action } => match action {
            TokenAction::Inspect { token } => commands::token::inspect(&token)?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, featured } => {
                commands::catalog::list(category.as_deref(), featured)?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Quote { items } => commands::cart::quote(&items)?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Register {
                email,
                name,
                role,
                password,
                admin_url,
            } => {
                let password = password.map(SecretString::from);
                commands::admin::register(admin_url, &name, &email, &role, password).await?;
            }
        },
    }
    Ok(())
}
