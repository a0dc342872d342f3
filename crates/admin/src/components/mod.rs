//! Reusable view components for admin templates.

pub mod data_table;

pub use data_table::{FilterOption, PageLink, Pager, page_href};
