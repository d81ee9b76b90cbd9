use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo::{CatalogStore, UserStore, WatchlistUpdate};
use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, CatalogKind, NewCatalogItem, NewUser, User},
};

/// Process-local store implementing both repositories.
///
/// Every mutation happens under a single write lock, which makes each
/// check-then-write sequence atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    movies: Vec<CatalogItem>,
    shows: Vec<CatalogItem>,
    users: HashMap<Uuid, User>,
}

impl MemoryStoreInner {
    fn items(&self, kind: CatalogKind) -> &Vec<CatalogItem> {
        match kind {
            CatalogKind::Movie => &self.movies,
            CatalogKind::Show => &self.shows,
        }
    }

    fn items_mut(&mut self, kind: CatalogKind) -> &mut Vec<CatalogItem> {
        match kind {
            CatalogKind::Movie => &mut self.movies,
            CatalogKind::Show => &mut self.shows,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_item(&self, kind: CatalogKind, id: Uuid) -> AppResult<Option<CatalogItem>> {
        let inner = self.inner.read().await;
        Ok(inner.items(kind).iter().find(|item| item.id == id).cloned())
    }

    async fn list_items(&self, kind: CatalogKind) -> AppResult<Vec<CatalogItem>> {
        let inner = self.inner.read().await;
        Ok(inner.items(kind).clone())
    }

    async fn find_items(&self, kind: CatalogKind, ids: &[Uuid]) -> AppResult<Vec<CatalogItem>> {
        let inner = self.inner.read().await;
        let items = inner.items(kind);
        Ok(ids
            .iter()
            .filter_map(|id| items.iter().find(|item| item.id == *id).cloned())
            .collect())
    }

    async fn count_items(&self, kind: CatalogKind) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.items(kind).len() as u64)
    }

    async fn seed_items(&self, kind: CatalogKind, items: Vec<NewCatalogItem>) -> AppResult<usize> {
        let mut inner = self.inner.write().await;
        let existing = inner.items_mut(kind);
        if !existing.is_empty() {
            return Ok(0);
        }
        existing.extend(items.into_iter().map(|item| item.into_item(kind)));
        Ok(existing.len())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .users
            .values()
            .any(|u| u.username == new_user.username || u.email == new_user.email);
        if taken {
            return Err(AppError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let user = User::new(new_user);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn append_to_watchlist(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<WatchlistUpdate> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(WatchlistUpdate::UserMissing);
        };
        let watchlist = user.watchlist_mut(kind);
        if watchlist.insert(item_id) {
            Ok(WatchlistUpdate::Applied(watchlist.clone()))
        } else {
            Ok(WatchlistUpdate::Rejected)
        }
    }

    async fn remove_from_watchlist(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<WatchlistUpdate> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(WatchlistUpdate::UserMissing);
        };
        let watchlist = user.watchlist_mut(kind);
        if watchlist.remove(&item_id) {
            Ok(WatchlistUpdate::Applied(watchlist.clone()))
        } else {
            Ok(WatchlistUpdate::Rejected)
        }
    }
}
