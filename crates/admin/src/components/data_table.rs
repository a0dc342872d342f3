//! Data table building blocks shared by the list pages.
//!
//! Filter selects and page links are computed here so templates only iterate
//! and print.

use storedesk_core::Page;

/// Option for a filter `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Whether this option matches the current filter.
    pub selected: bool,
}

impl FilterOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>, current: &str) -> Self {
        let value = value.into();
        Self {
            selected: value == current,
            label: label.into(),
            value,
        }
    }

    /// Build a select list, marking the option equal to `current`.
    #[must_use]
    pub fn list<V, L>(options: impl IntoIterator<Item = (V, L)>, current: &str) -> Vec<Self>
    where
        V: Into<String>,
        L: Into<String>,
    {
        options
            .into_iter()
            .map(|(value, label)| Self::new(value, label, current))
            .collect()
    }
}

/// One numbered page link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub is_current: bool,
}

/// Pagination controls for a list page.
///
/// Links keep every active filter and only change `page`.
#[derive(Debug, Clone)]
pub struct Pager {
    /// Whether there is more than one page.
    pub is_visible: bool,
    /// e.g. "Showing 11 to 20 of 45 orders"
    pub summary: String,
    pub has_prev: bool,
    pub prev_href: String,
    pub has_next: bool,
    pub next_href: String,
    pub links: Vec<PageLink>,
}

/// Number of page links shown around the current page.
const WINDOW: u32 = 5;

impl Pager {
    #[must_use]
    pub fn new(page: &Page, base_path: &str, params: &[(&str, String)], noun: &str) -> Self {
        let href = |number: u32| page_href(base_path, params, number);

        Self {
            is_visible: page.pages > 1,
            summary: if page.total == 0 {
                format!("No {noun}")
            } else {
                format!(
                    "Showing {} to {} of {} {noun}",
                    page.first_item(),
                    page.last_item(),
                    page.total
                )
            },
            has_prev: page.has_prev(),
            prev_href: href(page.prev()),
            has_next: page.has_next(),
            next_href: href(page.next()),
            links: page
                .window(WINDOW)
                .into_iter()
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    is_current: number == page.page,
                })
                .collect(),
        }
    }
}

/// Link to `page` of `base_path`, keeping non-empty `params`.
#[must_use]
pub fn page_href(base_path: &str, params: &[(&str, String)], page: u32) -> String {
    let mut query: Vec<String> = params
        .iter()
        .filter(|(key, value)| !value.is_empty() && *key != "page")
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();
    query.push(format!("page={page}"));
    format!("{base_path}?{}", query.join("&"))
}
