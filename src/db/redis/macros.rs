/// Read-through caching for an async computation.
///
/// Returns the value stored under `$key` when present. Otherwise awaits
/// `$block`, queues the result for storage with `$ttl` seconds to live, and
/// returns it. A failed cache read is logged and treated as a miss; errors from
/// `$block` propagate with `?`.
///
/// ```rust,ignore
/// async fn search(cache: &Cache, term: String) -> AppResult<Vec<CatalogItem>> {
///     let key = CacheKey::Search(term.clone());
///     cached!(cache, key, 3600, async { run_search(&term).await })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(hit)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(hit)
            }
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(key = %$key, error = %e, "Cache read failed, computing directly");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
