//! Storedesk Core - Shared types library.
//!
//! This crate provides common types used across all Storedesk components:
//! - `admin` - Server-rendered admin panel in front of the store backend
//! - `cli` - Command-line tools for operators
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no HTTP
//! clients. The store backend owns all business rules; what lives here is the
//! vocabulary the panel renders (IDs, statuses, money) plus the policy that
//! decides which order actions are offered.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, status enums, money formatting, pagination and
//!   the order action policy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
