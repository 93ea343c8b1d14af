//! Lotus Lane storefront library.
//!
//! Provides the storefront functionality as a library so the business
//! core (catalog feed, favorites synchronization, session cart) can be
//! tested and reused without running the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
