use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::{CatalogStore, UserStore, WatchlistUpdate},
    error::{AppError, AppResult},
    models::{CatalogItem, CatalogKind, Watchlist},
};

/// Add, remove and list operations over a user's movie and show watchlists.
///
/// Membership changes are delegated to the store as single conditional
/// updates, so concurrent requests for the same user can neither duplicate
/// nor lose an entry.
pub struct WatchlistManager {
    catalog: Arc<dyn CatalogStore>,
    users: Arc<dyn UserStore>,
}

impl WatchlistManager {
    pub fn new(catalog: Arc<dyn CatalogStore>, users: Arc<dyn UserStore>) -> Self {
        Self { catalog, users }
    }

    async fn require_item(&self, kind: CatalogKind, item_id: Uuid) -> AppResult<()> {
        match self.catalog.find_item(kind, item_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::ItemNotFound(kind)),
        }
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<()> {
        match self.users.find_user_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::UserNotFound),
        }
    }

    /// Appends `item_id` to the end of the user's watchlist of `kind`
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<Watchlist> {
        self.require_item(kind, item_id).await?;
        self.require_user(user_id).await?;

        match self
            .users
            .append_to_watchlist(user_id, kind, item_id)
            .await?
        {
            WatchlistUpdate::Applied(watchlist) => {
                tracing::info!(size = watchlist.len(), "Added to watchlist");
                Ok(watchlist)
            }
            WatchlistUpdate::Rejected => Err(AppError::AlreadyInWatchlist(kind)),
            WatchlistUpdate::UserMissing => Err(AppError::UserNotFound),
        }
    }

    /// Removes `item_id` from the user's watchlist of `kind`
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<Watchlist> {
        self.require_item(kind, item_id).await?;
        self.require_user(user_id).await?;

        match self
            .users
            .remove_from_watchlist(user_id, kind, item_id)
            .await?
        {
            WatchlistUpdate::Applied(watchlist) => {
                tracing::info!(size = watchlist.len(), "Removed from watchlist");
                Ok(watchlist)
            }
            WatchlistUpdate::Rejected => Err(AppError::NotInWatchlist(kind)),
            WatchlistUpdate::UserMissing => Err(AppError::UserNotFound),
        }
    }

    /// The user's watchlist of `kind` with every entry resolved to its item, in stored order
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid, kind: CatalogKind) -> AppResult<Vec<CatalogItem>> {
        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let ids = user.watchlist(kind).ids();
        let items = self.catalog.find_items(kind, ids).await?;
        if items.len() != ids.len() {
            tracing::warn!(
                expected = ids.len(),
                resolved = items.len(),
                "Watchlist references items missing from the catalog"
            );
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{GenreIds, NewCatalogItem, NewUser};

    struct Fixture {
        manager: Arc<WatchlistManager>,
        user_id: Uuid,
        movies: Vec<CatalogItem>,
        shows: Vec<CatalogItem>,
    }

    fn new_item(title: &str) -> NewCatalogItem {
        NewCatalogItem {
            title: title.to_string(),
            description: format!("About {}", title),
            release_date: "2010-07-16".to_string(),
            genre: GenreIds::from(vec![28, 878]),
            popularity: 35000,
        }
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        store
            .seed_items(
                CatalogKind::Movie,
                vec![new_item("Inception"), new_item("Heat"), new_item("Alien")],
            )
            .await
            .unwrap();
        store
            .seed_items(CatalogKind::Show, vec![new_item("Severance")])
            .await
            .unwrap();
        let user = store
            .create_user(NewUser {
                username: "watcher".to_string(),
                email: "watcher@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let movies = store.list_items(CatalogKind::Movie).await.unwrap();
        let shows = store.list_items(CatalogKind::Show).await.unwrap();
        let store = Arc::new(store);

        Fixture {
            manager: Arc::new(WatchlistManager::new(store.clone(), store)),
            user_id: user.id,
            movies,
            shows,
        }
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let f = fixture().await;
        f.manager
            .add(f.user_id, CatalogKind::Movie, f.movies[1].id)
            .await
            .unwrap();
        let list = f
            .manager
            .add(f.user_id, CatalogKind::Movie, f.movies[0].id)
            .await
            .unwrap();
        assert_eq!(list.ids(), &[f.movies[1].id, f.movies[0].id]);
    }

    #[tokio::test]
    async fn test_second_add_is_rejected_without_change() {
        let f = fixture().await;
        let item = f.movies[0].id;
        f.manager.add(f.user_id, CatalogKind::Movie, item).await.unwrap();

        let second = f.manager.add(f.user_id, CatalogKind::Movie, item).await;
        assert!(matches!(
            second,
            Err(AppError::AlreadyInWatchlist(CatalogKind::Movie))
        ));

        let listed = f.manager.list(f.user_id, CatalogKind::Movie).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_previous_state() {
        let f = fixture().await;
        f.manager
            .add(f.user_id, CatalogKind::Movie, f.movies[0].id)
            .await
            .unwrap();
        f.manager
            .add(f.user_id, CatalogKind::Movie, f.movies[2].id)
            .await
            .unwrap();
        let before: Vec<Uuid> = f
            .manager
            .list(f.user_id, CatalogKind::Movie)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();

        f.manager
            .add(f.user_id, CatalogKind::Movie, f.movies[1].id)
            .await
            .unwrap();
        let after = f
            .manager
            .remove(f.user_id, CatalogKind::Movie, f.movies[1].id)
            .await
            .unwrap();

        assert_eq!(after.ids(), before.as_slice());
    }

    #[tokio::test]
    async fn test_remove_keeps_relative_order() {
        let f = fixture().await;
        for movie in &f.movies {
            f.manager
                .add(f.user_id, CatalogKind::Movie, movie.id)
                .await
                .unwrap();
        }
        let list = f
            .manager
            .remove(f.user_id, CatalogKind::Movie, f.movies[1].id)
            .await
            .unwrap();
        assert_eq!(list.ids(), &[f.movies[0].id, f.movies[2].id]);
    }

    #[tokio::test]
    async fn test_remove_never_added() {
        let f = fixture().await;
        let result = f
            .manager
            .remove(f.user_id, CatalogKind::Show, f.shows[0].id)
            .await;
        assert!(matches!(
            result,
            Err(AppError::NotInWatchlist(CatalogKind::Show))
        ));
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let f = fixture().await;
        let add = f
            .manager
            .add(f.user_id, CatalogKind::Movie, Uuid::new_v4())
            .await;
        assert!(matches!(add, Err(AppError::ItemNotFound(CatalogKind::Movie))));

        let remove = f
            .manager
            .remove(f.user_id, CatalogKind::Movie, Uuid::new_v4())
            .await;
        assert!(matches!(
            remove,
            Err(AppError::ItemNotFound(CatalogKind::Movie))
        ));
    }

    #[tokio::test]
    async fn test_item_of_other_kind_is_not_found() {
        let f = fixture().await;
        let result = f
            .manager
            .add(f.user_id, CatalogKind::Show, f.movies[0].id)
            .await;
        assert!(matches!(result, Err(AppError::ItemNotFound(CatalogKind::Show))));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let f = fixture().await;
        let stranger = Uuid::new_v4();

        let add = f.manager.add(stranger, CatalogKind::Movie, f.movies[0].id).await;
        assert!(matches!(add, Err(AppError::UserNotFound)));

        let list = f.manager.list(stranger, CatalogKind::Movie).await;
        assert!(matches!(list, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_list_populates_items() {
        let f = fixture().await;
        f.manager
            .add(f.user_id, CatalogKind::Show, f.shows[0].id)
            .await
            .unwrap();

        let shows = f.manager.list(f.user_id, CatalogKind::Show).await.unwrap();
        assert_eq!(shows, vec![f.shows[0].clone()]);

        let movies = f.manager.list(f.user_id, CatalogKind::Movie).await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_yield_one_entry() {
        let f = fixture().await;
        let item = f.movies[0].id;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = f.manager.clone();
                let user_id = f.user_id;
                tokio::spawn(async move { manager.add(user_id, CatalogKind::Movie, item).await })
            })
            .collect();

        let mut successes = 0;
        let mut rejections = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::AlreadyInWatchlist(_)) => rejections += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(rejections, 7);
        let listed = f.manager.list(f.user_id, CatalogKind::Movie).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_of_distinct_items_all_land() {
        let store = Arc::new(MemoryStore::new());
        let titles: Vec<NewCatalogItem> = (0..16).map(|i| new_item(&format!("Movie {}", i))).collect();
        store.seed_items(CatalogKind::Movie, titles).await.unwrap();
        let user = store
            .create_user(NewUser {
                username: "binger".to_string(),
                email: "binger@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let movies = store.list_items(CatalogKind::Movie).await.unwrap();
        let manager = Arc::new(WatchlistManager::new(store.clone(), store));

        let tasks: Vec<_> = movies
            .iter()
            .map(|movie| {
                let manager = manager.clone();
                let (user_id, item) = (user.id, movie.id);
                tokio::spawn(async move { manager.add(user_id, CatalogKind::Movie, item).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut listed: Vec<Uuid> = manager
            .list(user.id, CatalogKind::Movie)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        let mut expected: Vec<Uuid> = movies.iter().map(|m| m.id).collect();
        listed.sort();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_remove_and_add_both_apply() {
        for _ in 0..20 {
            let f = fixture().await;
            let (first, second, third) = (f.movies[0].id, f.movies[1].id, f.movies[2].id);
            f.manager.add(f.user_id, CatalogKind::Movie, first).await.unwrap();
            f.manager.add(f.user_id, CatalogKind::Movie, second).await.unwrap();

            let remover = {
                let manager = f.manager.clone();
                let user_id = f.user_id;
                tokio::spawn(async move { manager.remove(user_id, CatalogKind::Movie, first).await })
            };
            let adder = {
                let manager = f.manager.clone();
                let user_id = f.user_id;
                tokio::spawn(async move { manager.add(user_id, CatalogKind::Movie, third).await })
            };
            remover.await.unwrap().unwrap();
            adder.await.unwrap().unwrap();

            let listed: Vec<Uuid> = f
                .manager
                .list(f.user_id, CatalogKind::Movie)
                .await
                .unwrap()
                .iter()
                .map(|i| i.id)
                .collect();
            assert_eq!(listed, vec![second, third]);
        }
    }
}
