use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CatalogItem, CatalogKind, NewCatalogItem, NewUser, User, Watchlist},
};

/// Outcome of a conditional watchlist update
#[derive(Debug, Clone, PartialEq)]
pub enum WatchlistUpdate {
    /// The update was applied; carries the watchlist as stored afterwards
    Applied(Watchlist),
    /// The user exists but the membership condition did not hold
    Rejected,
    /// No user with that id
    UserMissing,
}

/// Movie and show records. Effectively read-only once seeded.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_item(&self, kind: CatalogKind, id: Uuid) -> AppResult<Option<CatalogItem>>;

    /// All items of `kind` in insertion order
    async fn list_items(&self, kind: CatalogKind) -> AppResult<Vec<CatalogItem>>;

    /// Resolves `ids` in the order given. Ids with no matching item are skipped.
    async fn find_items(&self, kind: CatalogKind, ids: &[Uuid]) -> AppResult<Vec<CatalogItem>>;

    async fn count_items(&self, kind: CatalogKind) -> AppResult<u64>;

    /// Stores every item or none of them. Does nothing and returns 0 when
    /// `kind` already has items.
    async fn seed_items(&self, kind: CatalogKind, items: Vec<NewCatalogItem>) -> AppResult<usize>;
}

/// Accounts and their watchlists
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Atomically appends `item_id` if it is not already in the watchlist
    async fn append_to_watchlist(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<WatchlistUpdate>;

    /// Atomically removes `item_id` if it is in the watchlist
    async fn remove_from_watchlist(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<WatchlistUpdate>;
}
