//! Domain shop CLI - search domains, manage the cart, check out.
//!
//! # Usage
//!
//! ```bash
//! # Search every suffix for a name
//! shop search mystartup
//!
//! # Add a search result or a featured product
//! shop cart add mystartup.io
//! shop cart buy 2
//!
//! # Show the cart and start a hosted checkout
//! shop cart
//! shop checkout
//!
//! # Interactive shell with search-as-you-type
//! shop shell
//! ```
//!
//! Results go to stdout; logs go to stderr (`RUST_LOG`, default `warn`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use domain_shop_cli::commands::Action;
use domain_shop_cli::{ClientConfig, Reply, Session, render, shell};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Search domains, keep a cart and check out")]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every suffix for a name
    Search {
        /// Name or domain to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List featured products
    Products,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Start a hosted checkout for the cart
    Checkout,
    /// Interactive shell
    Shell,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart (default)
    Show,
    /// Add an available domain
    Add { domain: String },
    /// Add a featured product by id
    Buy { product_id: String },
    /// Remove a domain
    Remove { domain: String },
    /// Remove a row by id
    RemoveId { id: String },
    /// Empty the cart
    Clear,
}

impl Commands {
    /// Dispatch-table action and argument string for a one-shot command.
    fn action(self) -> Option<(Action, String)> {
        let mapped = match self {
            Self::Search { query } => (Action::Search, query.join(" ")),
            Self::Products => (Action::Products, String::new()),
            Self::Cart { action } => match action.unwrap_or(CartAction::Show) {
                CartAction::Show => (Action::Cart, String::new()),
                CartAction::Add { domain } => (Action::Add, domain),
                CartAction::Buy { product_id } => (Action::Buy, product_id),
                CartAction::Remove { domain } => (Action::Remove, domain),
                CartAction::RemoveId { id } => (Action::RemoveId, id),
                CartAction::Clear => (Action::Clear, String::new()),
            },
            Self::Checkout => (Action::Checkout, String::new()),
            Self::Shell => return None,
        };
        Some(mapped)
    }
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads environment fallbacks
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(message) = run(cli).await {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut session = Session::open(&cli.config).map_err(|e| e.user_message())?;

    let Some((action, args)) = cli.command.action() else {
        return shell::run(&mut session, cli.config.debounce())
            .await
            .map_err(|e| e.to_string());
    };

    match session.execute(action, &args).await {
        Ok(Reply::Text(text)) => render::emit(&text),
        Ok(Reply::Redirect(url)) => render::emit(&format!("Continue to payment: {url}")),
        Ok(Reply::Quit) => {}
        Err(err) => return Err(err.user_message()),
    }
    Ok(())
}
