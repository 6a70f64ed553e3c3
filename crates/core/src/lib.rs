//! domain-shop Core - Domain search, pricing and cart library.
//!
//! This crate provides the pieces shared by every domain-shop component:
//! - `storefront` - HTTP service hosting the checkout endpoint and search API
//! - `cli` - Command-line client that owns the local cart
//!
//! # Architecture
//!
//! The core crate contains types, pure functions and the cart store - no
//! network I/O and no filesystem access. Persistence goes through the
//! [`cart::KeyValueStore`] trait so each client supplies its own backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices
//! - [`search`] - Availability oracle, price table and the search engine
//! - [`catalog`] - Pre-seeded products that can be added by id
//! - [`cart`] - Cart store persisted to key-value storage
//! - [`checkout`] - Wire types for the checkout endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;
pub mod types;

pub use types::*;
