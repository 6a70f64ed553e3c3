//! Domain shop terminal client.
//!
//! Searches domains, keeps a persistent cart and hands checkout off to the
//! storefront's hosted payment flow.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod render;
pub mod session;
pub mod shell;
pub mod storage;

pub use checkout::{CheckoutClient, CheckoutError};
pub use config::ClientConfig;
pub use session::{Reply, Session, SessionError};
pub use storage::FileStore;
