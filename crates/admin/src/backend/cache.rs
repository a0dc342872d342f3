//! Shared cache of backend read results.
//!
//! Every read the panel makes goes through [`QueryCache::get_or_fetch`] under a
//! [`QueryKey`]. Mutations invalidate whole key families by prefix, so the next
//! page render refetches whatever the mutation may have changed.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, warn};

use super::BackendError;
use crate::config::CacheConfig;

type CachedValue = Arc<dyn Any + Send + Sync>;

/// Hierarchical cache key: path segments plus canonical query parameters.
///
/// Renders as `orders/list?page=1&status=shipped`. Parameters are sorted so
/// equal filters always produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    segments: Vec<String>,
    params: Vec<(String, String)>,
}

impl QueryKey {
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            params: Vec::new(),
        }
    }

    /// Append a path segment.
    #[must_use]
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Attach query parameters.
    #[must_use]
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.params.sort();
        self
    }

    /// The segment path without parameters, used for prefix matching.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    #[must_use]
    pub fn render(&self) -> String {
        let path = self.path();
        if self.params.is_empty() {
            return path;
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        format!("{path}?{}", query.join("&"))
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Whether a rendered key equals the prefix or lies beneath it.
fn is_under(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
}

/// TTL-bounded cache of backend results, shared by all sessions.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<String, CachedValue>,
}

impl QueryCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .support_invalidation_closures()
            .build();

        debug!(
            capacity = config.capacity,
            ttl_secs = config.ttl.as_secs(),
            "Query cache initialized"
        );
        Self { inner }
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Failed fetches are not cached.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` returns.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, BackendError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let rendered = key.render();

        if let Some(hit) = self.inner.get(&rendered).await {
            if let Some(value) = hit.downcast_ref::<T>() {
                debug!(key = %rendered, "Cache hit");
                return Ok(value.clone());
            }
            warn!(key = %rendered, "Cached value has unexpected type, refetching");
        }

        let value = fetch().await?;
        let cached: CachedValue = Arc::new(value.clone());
        self.inner.insert(rendered, cached).await;
        Ok(value)
    }

    /// Drop every entry whose key equals `prefix` or lies beneath it.
    ///
    /// `orders/list` matches `orders/list?page=2` and `orders/list/x` but not
    /// `orders/listing`.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) {
        let prefix = prefix.path();
        debug!(prefix = %prefix, "Invalidating cached queries");
        let result = self
            .inner
            .invalidate_entries_if(move |key, _| is_under(key, &prefix));
        if let Err(e) = result {
            warn!(error = %e, "Failed to register cache invalidation");
        }
    }

    /// Invalidate several key families at once.
    pub fn invalidate_all_of<'a>(&self, prefixes: impl IntoIterator<Item = &'a QueryKey>) {
        for prefix in prefixes {
            self.invalidate_prefix(prefix);
        }
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

/// Key families for every cached backend read.
pub mod keys {
    use storedesk_core::{AdminId, CategoryId, OrderId, ProductId, UserId};

    use super::QueryKey;
    use crate::backend::types::{
        AdminsQuery, CategoriesQuery, CategoryProductsQuery, OrdersQuery, ProductsQuery,
        UsersQuery,
    };

    #[must_use]
    pub fn orders() -> QueryKey {
        QueryKey::new(["orders"])
    }

    #[must_use]
    pub fn orders_lists() -> QueryKey {
        orders().push("list")
    }

    #[must_use]
    pub fn orders_list(query: &OrdersQuery) -> QueryKey {
        orders_lists().with_params(query.params())
    }

    #[must_use]
    pub fn order_detail(id: &OrderId) -> QueryKey {
        orders().push("detail").push(id.as_str())
    }

    #[must_use]
    pub fn products_lists() -> QueryKey {
        QueryKey::new(["products", "list"])
    }

    #[must_use]
    pub fn products_list(query: &ProductsQuery) -> QueryKey {
        products_lists().with_params(query.params())
    }

    #[must_use]
    pub fn product_detail(id: &ProductId) -> QueryKey {
        QueryKey::new(["products", "detail", id.as_str()])
    }

    #[must_use]
    pub fn products_stats() -> QueryKey {
        QueryKey::new(["products", "stats"])
    }

    #[must_use]
    pub fn categories_lists() -> QueryKey {
        QueryKey::new(["categories", "list"])
    }

    #[must_use]
    pub fn categories_list(query: CategoriesQuery) -> QueryKey {
        categories_lists().with_params(query.params())
    }

    #[must_use]
    pub fn categories_tree() -> QueryKey {
        QueryKey::new(["categories", "tree"])
    }

    #[must_use]
    pub fn category_detail(id: &CategoryId) -> QueryKey {
        QueryKey::new(["categories", "detail", id.as_str()])
    }

    #[must_use]
    pub fn subcategories(parent: &CategoryId) -> QueryKey {
        QueryKey::new(["categories", "subcategories", parent.as_str()])
    }

    #[must_use]
    pub fn subcategories_list(parent: &CategoryId, include_inactive: bool) -> QueryKey {
        subcategories(parent).with_params([("include_inactive", include_inactive.to_string())])
    }

    #[must_use]
    pub fn category_products(id: &CategoryId, query: &CategoryProductsQuery) -> QueryKey {
        QueryKey::new(["categories", "products", id.as_str()]).with_params(query.params())
    }

    #[must_use]
    pub fn admins() -> QueryKey {
        QueryKey::new(["admins"])
    }

    /// Admin lists are scoped by viewer because `include_self` depends on who asks.
    #[must_use]
    pub fn admins_list(viewer: &AdminId, query: AdminsQuery) -> QueryKey {
        admins()
            .push("list")
            .push(viewer.as_str())
            .with_params(query.params())
    }

    #[must_use]
    pub fn admin_detail(id: &AdminId) -> QueryKey {
        admins().push("detail").push(id.as_str())
    }

    #[must_use]
    pub fn users() -> QueryKey {
        QueryKey::new(["users"])
    }

    #[must_use]
    pub fn users_list(query: &UsersQuery) -> QueryKey {
        users().push("list").with_params(query.params())
    }

    #[must_use]
    pub fn user_detail(id: &UserId) -> QueryKey {
        users().push("detail").push(id.as_str())
    }

    #[must_use]
    pub fn dashboard() -> QueryKey {
        QueryKey::new(["dashboard"])
    }

    #[must_use]
    pub fn dashboard_stats() -> QueryKey {
        dashboard().push("stats")
    }

    #[must_use]
    pub fn revenue_trend(days: u32) -> QueryKey {
        dashboard().push("revenue-trend").push(days.to_string())
    }

    #[must_use]
    pub fn order_status_breakdown() -> QueryKey {
        dashboard().push("order-status-breakdown")
    }

    #[must_use]
    pub fn low_stock(limit: u32) -> QueryKey {
        dashboard().push("low-stock").push(limit.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use storedesk_core::{OrderId, OrderStatus};

    use super::*;
    use crate::backend::types::OrdersQuery;

    fn cache() -> QueryCache {
        QueryCache::new(CacheConfig {
            ttl: Duration::from_secs(60),
            capacity: 100,
        })
    }

    #[test]
    fn test_key_params_are_sorted_and_encoded() {
        let key = QueryKey::new(["users", "list"])
            .with_params([("search", "ada lovelace"), ("page", "2")]);
        assert_eq!(key.render(), "users/list?page=2&search=ada%20lovelace");
        assert_eq!(key.path(), "users/list");
    }

    #[test]
    fn test_is_under_respects_segment_boundaries() {
        assert!(is_under("orders/list", "orders/list"));
        assert!(is_under("orders/list?page=1", "orders/list"));
        assert!(is_under("orders/detail/o-1", "orders"));
        assert!(!is_under("orders/listing", "orders/list"));
        assert!(!is_under("ordersx/list", "orders"));
    }

    #[test]
    fn test_order_keys_share_family_prefix() {
        let query = OrdersQuery {
            page: 1,
            per_page: 10,
            status: Some(OrderStatus::Shipped),
            ..OrdersQuery::default()
        };
        let list = keys::orders_list(&query).render();
        assert!(is_under(&list, &keys::orders_lists().path()));
        assert!(!is_under(&keys::order_detail(&OrderId::new("o-1")).render(), "orders/list"));
    }

    #[tokio::test]
    async fn test_get_or_fetch_caches_success() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new(["products", "stats"]);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(&key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, BackendError>(42_u64)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = cache();
        let key = QueryKey::new(["dashboard", "stats"]);

        let first: Result<u64, _> = cache
            .get_or_fetch(&key, || async { Err(BackendError::SessionExpired) })
            .await;
        assert!(first.is_err());

        let second = cache
            .get_or_fetch(&key, || async { Ok::<_, BackendError>(7_u64) })
            .await
            .unwrap();
        assert_eq!(second, 7);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_only_drops_family() {
        let cache = cache();
        let list = QueryKey::new(["orders", "list"]).with_params([("page", "1")]);
        let detail = QueryKey::new(["orders", "detail", "o-1"]);
        let listing = QueryKey::new(["orders", "listing"]);

        for key in [&list, &detail, &listing] {
            cache
                .get_or_fetch(key, || async { Ok::<_, BackendError>(1_u32) })
                .await
                .unwrap();
        }

        cache.invalidate_prefix(&QueryKey::new(["orders", "list"]));

        let refetched = AtomicUsize::new(0);
        for key in [&list, &detail, &listing] {
            cache
                .get_or_fetch(key, || async {
                    refetched.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, BackendError>(2_u32)
                })
                .await
                .unwrap();
        }
        assert_eq!(refetched.load(Ordering::SeqCst), 1);
    }
}
