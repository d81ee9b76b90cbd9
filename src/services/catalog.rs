use std::sync::Arc;

use uuid::Uuid;

use crate::{
    cached,
    db::{Cache, CacheKey, CatalogStore},
    error::{AppError, AppResult},
    models::{CatalogItem, CatalogKind},
    services::{
        catalog_filter::{self, SortKey},
        genre_index, search,
        seeding::CatalogSeeder,
    },
};

/// Read side of the catalog: listing, lookup, filtering and search.
///
/// Reads that scan a whole kind seed it first. When a Redis cache is
/// configured, filter and search results are served through it; the catalog
/// does not change after seeding, so cached results stay valid until they expire.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    seeder: Arc<CatalogSeeder>,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        seeder: Arc<CatalogSeeder>,
        cache: Option<Cache>,
        cache_ttl: u64,
    ) -> Self {
        Self {
            store,
            seeder,
            cache,
            cache_ttl,
        }
    }

    /// Every item of `kind` in store order
    pub async fn list(&self, kind: CatalogKind) -> AppResult<Vec<CatalogItem>> {
        self.seeder.ensure_seeded(kind).await?;
        self.store.list_items(kind).await
    }

    pub async fn get(&self, kind: CatalogKind, id: Uuid) -> AppResult<CatalogItem> {
        self.store
            .find_item(kind, id)
            .await?
            .ok_or(AppError::ItemNotFound(kind))
    }

    /// Filters `kind` by genre name and orders the result by `sort_by`.
    ///
    /// An unrecognized `sort_by` leaves store order untouched.
    pub async fn filter(
        &self,
        kind: CatalogKind,
        genre: Option<&str>,
        sort_by: Option<&str>,
    ) -> AppResult<Vec<CatalogItem>> {
        // Resolve before touching the store so invalid genres fail on an empty catalog too
        let genre_id = genre.map(genre_index::genre_id).transpose()?;
        let sort = sort_by.and_then(SortKey::parse);

        self.seeder.ensure_seeded(kind).await?;

        let items = match &self.cache {
            Some(cache) => {
                let key = CacheKey::Filter {
                    kind,
                    genre: genre_id,
                    sort: sort.map(|s| s.as_str()),
                };
                self.cached_filter(cache, key, kind, genre_id, sort).await?
            }
            None => self.run_filter(kind, genre_id, sort).await?,
        };

        catalog_filter::require_matches(kind, items)
    }

    async fn cached_filter(
        &self,
        cache: &Cache,
        key: CacheKey,
        kind: CatalogKind,
        genre_id: Option<u32>,
        sort: Option<SortKey>,
    ) -> AppResult<Vec<CatalogItem>> {
        cached!(cache, key, self.cache_ttl, self.run_filter(kind, genre_id, sort))
    }

    async fn run_filter(
        &self,
        kind: CatalogKind,
        genre_id: Option<u32>,
        sort: Option<SortKey>,
    ) -> AppResult<Vec<CatalogItem>> {
        let items = self.store.list_items(kind).await?;
        Ok(catalog_filter::filter_items(items, genre_id, sort))
    }

    /// Case-insensitive search across movies and shows, movies first
    pub async fn search(&self, term: Option<&str>) -> AppResult<Vec<CatalogItem>> {
        let term = search::normalize_term(term)?;

        for kind in CatalogKind::ALL {
            self.seeder.ensure_seeded(kind).await?;
        }

        let found = match &self.cache {
            Some(cache) => {
                let key = CacheKey::Search(term.clone());
                self.cached_search(cache, key, &term).await?
            }
            None => self.run_search(&term).await?,
        };

        search::require_results(found)
    }

    async fn cached_search(
        &self,
        cache: &Cache,
        key: CacheKey,
        term: &str,
    ) -> AppResult<Vec<CatalogItem>> {
        cached!(cache, key, self.cache_ttl, self.run_search(term))
    }

    async fn run_search(&self, term: &str) -> AppResult<Vec<CatalogItem>> {
        let movies = self.store.list_items(CatalogKind::Movie).await?;
        let shows = self.store.list_items(CatalogKind::Show).await?;
        Ok(search::search_items(movies, shows, term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::services::providers::{MockCatalogProvider, ProviderTitle};

    fn title(name: &str, overview: &str, genre_ids: Vec<u32>, votes: i64) -> ProviderTitle {
        ProviderTitle {
            title: name.to_string(),
            overview: overview.to_string(),
            release_date: "2000-01-01".to_string(),
            genre_ids,
            vote_count: votes,
        }
    }

    fn service() -> CatalogService {
        service_with_cache(None)
    }

    fn service_with_cache(cache: Option<Cache>) -> CatalogService {
        let store = Arc::new(MemoryStore::new());
        let mut provider = MockCatalogProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_fetch_top_rated()
            .returning(|kind, _| match kind {
                CatalogKind::Movie => Ok(vec![
                    title("Zombieland", "Road trip", vec![35, 27], 12000),
                    title("Heat", "A heist", vec![80, 18], 7000),
                ]),
                CatalogKind::Show => Ok(vec![title(
                    "The Walking Dead",
                    "A zombie outbreak",
                    vec![18, 10765],
                    15000,
                )]),
            });

        let seeder = Arc::new(CatalogSeeder::new(store.clone(), Arc::new(provider), 1));
        CatalogService::new(store, seeder, cache, 60)
    }

    #[tokio::test]
    async fn test_list_seeds_first() {
        let service = service();
        let movies = service.list(CatalogKind::Movie).await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Zombieland");
    }

    #[tokio::test]
    async fn test_filter_by_genre_and_sort() {
        let service = service();
        let result = service
            .filter(CatalogKind::Movie, Some("Crime"), Some("rating"))
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Heat");
    }

    #[tokio::test]
    async fn test_filter_invalid_genre() {
        let service = service();
        let result = service.filter(CatalogKind::Show, Some("Cooking"), None).await;
        assert!(matches!(result, Err(AppError::InvalidGenre(_))));
    }

    #[tokio::test]
    async fn test_filter_without_matches() {
        let service = service();
        let result = service.filter(CatalogKind::Show, Some("Western"), None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_across_kinds() {
        let service = service();
        let found = service.search(Some("ZOM")).await.unwrap();
        let titles: Vec<&str> = found.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Zombieland", "The Walking Dead"]);
    }

    #[tokio::test]
    async fn test_search_errors() {
        let service = service();
        assert!(matches!(
            service.search(Some(" ")).await,
            Err(AppError::EmptySearchTerm)
        ));
        assert!(matches!(
            service.search(Some("xyzzy")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_item() {
        let service = service();
        let result = service.get(CatalogKind::Movie, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::ItemNotFound(CatalogKind::Movie))));
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back_to_store() {
        // Nothing listens on port 1, so every cache read fails
        let client = crate::db::create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _writer) = Cache::new(client).await;
        let service = service_with_cache(Some(cache));

        let filtered = service
            .filter(CatalogKind::Movie, Some("Horror"), None)
            .await
            .unwrap();
        assert_eq!(filtered[0].title, "Zombieland");

        let found = service.search(Some("heist")).await.unwrap();
        assert_eq!(found[0].title, "Heat");
    }
}
