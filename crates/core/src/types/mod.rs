//! Core types for Storedesk.
//!
//! This module provides type-safe wrappers for the store backend's domain
//! concepts and the small amount of view policy shared by every front end.

pub mod email;
pub mod id;
pub mod money;
pub mod order_action;
pub mod pagination;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{DEFAULT_CURRENCY, Money, format_compact_thousands, format_percent_change};
pub use order_action::{OrderAction, available_actions};
pub use pagination::{ORDER_PAGE_SIZES, Page};
pub use status::*;
