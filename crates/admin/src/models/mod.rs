//! Domain models for the admin panel that live in the session.

pub mod session;

pub use session::{CurrentAdmin, Flash, FlashLevel, keys as session_keys, push_flash, take_flashes};
