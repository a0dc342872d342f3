//! Storedesk admin panel library.
//!
//! Server-rendered back office for a store whose data lives behind a remote
//! REST backend. Pages are rendered with Askama, every read and write goes
//! through [`backend::ApiSession`], and the admin's backend tokens live in
//! their server-side session.
//!
//! The crate is a library so the router can be exercised in tests; the
//! binary in `main.rs` only adds process setup (Sentry, tracing, TLS).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
