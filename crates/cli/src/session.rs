//! A client session: one cart, one search engine, one checkout client.

use domain_shop_core::cart::{CartError, CartStore, KeyValueStore};
use domain_shop_core::catalog::PRODUCTS;
use domain_shop_core::search::SearchEngine;
use domain_shop_core::{ItemId, ProductId};
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

use crate::checkout::{CheckoutClient, CheckoutError};
use crate::commands::Action;
use crate::config::ClientConfig;
use crate::render;
use crate::storage::FileStore;

/// Errors from session commands.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("{0} is not a domain we sell")]
    UnknownDomain(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid API URL: {0}")]
    ApiUrl(#[from] url::ParseError),
}

impl SessionError {
    /// Message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(err) => err.user_message(),
            _ => self.to_string(),
        }
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to show.
    Text(String),
    /// Send the buyer to this hosted payment page.
    Redirect(Url),
    /// End the shell.
    Quit,
}

/// State for one user of the shop.
pub struct Session<S> {
    cart: CartStore<S>,
    search: SearchEngine,
    checkout: CheckoutClient,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(cart: CartStore<S>, search: SearchEngine, checkout: CheckoutClient) -> Self {
        Self {
            cart,
            search,
            checkout,
        }
    }

    #[must_use]
    pub const fn search_engine(&self) -> &SearchEngine {
        &self.search
    }

    pub const fn cart(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// Cart change notifications.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<domain_shop_core::cart::CartSummary> {
        self.cart.subscribe()
    }

    /// Perform `action` with the rest of the command line as `args`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for bad arguments, cart storage failures and
    /// failed checkouts. The cart is unchanged after any error.
    pub async fn execute(&mut self, action: Action, args: &str) -> Result<Reply, SessionError> {
        let args = args.trim();
        let reply = match action {
            Action::Search => {
                Reply::Text(render::results(args, self.search.search(args).as_ref()))
            }
            Action::Products => Reply::Text(render::products(PRODUCTS)),
            Action::Cart => self.show_cart()?,
            Action::Add => {
                let domain = required(args, "add <domain>")?;
                let quote = self
                    .search
                    .quote(domain)
                    .ok_or_else(|| SessionError::UnknownDomain(domain.to_string()))?;
                let id = self.cart.add_domain(&quote)?;
                Reply::Text(format!("Added {} [{id}]", quote.domain))
            }
            Action::Buy => {
                let raw = required(args, "buy <product-id>")?;
                let id: ProductId = raw
                    .trim_start_matches('#')
                    .parse()
                    .map_err(|_| SessionError::InvalidId(raw.to_string()))?;
                if self.cart.add_product(id)? {
                    Reply::Text(format!("Added product #{id}"))
                } else {
                    Reply::Text(format!("No product #{id}"))
                }
            }
            Action::Remove => {
                let domain = required(args, "remove <domain>")?;
                if self.cart.remove(domain)? {
                    Reply::Text(format!("Removed {domain}"))
                } else {
                    Reply::Text(format!("{domain} is not in your cart"))
                }
            }
            Action::RemoveId => {
                let raw = required(args, "remove-id <id>")?;
                let id: ItemId = raw
                    .parse()
                    .map_err(|_| SessionError::InvalidId(raw.to_string()))?;
                if self.cart.remove_by_id(id)? {
                    Reply::Text(format!("Removed [{id}]"))
                } else {
                    Reply::Text(format!("No cart row [{id}]"))
                }
            }
            Action::Clear => {
                self.cart.clear()?;
                Reply::Text("Cart cleared".to_string())
            }
            Action::Checkout => Reply::Redirect(self.checkout().await?),
            Action::Help => Reply::Text(render::help()),
            Action::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    /// Start a hosted checkout for the current cart.
    ///
    /// The cart is kept; it is the payment page's job to confirm the order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Checkout` for an empty cart or a failed
    /// request.
    pub async fn checkout(&mut self) -> Result<Url, SessionError> {
        let items = self.cart.items()?.to_vec();
        Ok(self.checkout.initiate(&items).await?)
    }

    fn show_cart(&mut self) -> Result<Reply, SessionError> {
        let summary = self.cart.summary()?;
        Ok(Reply::Text(render::cart(self.cart.items()?, &summary)))
    }
}

impl Session<FileStore> {
    /// Open the session described by `config`, with the cart in its file.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the API URL or HTTP client is unusable.
    pub fn open(config: &ClientConfig) -> Result<Self, SessionError> {
        let checkout = CheckoutClient::new(config.checkout_endpoint()?)?;
        tracing::debug!(
            cart_file = %config.cart_file.display(),
            endpoint = %checkout.endpoint(),
            "Opening session"
        );
        Ok(Self::new(
            CartStore::new(FileStore::new(&config.cart_file)),
            SearchEngine::default(),
            checkout,
        ))
    }
}

fn required<'a>(args: &'a str, usage: &'static str) -> Result<&'a str, SessionError> {
    if args.is_empty() {
        Err(SessionError::Usage(usage))
    } else {
        Ok(args)
    }
}
