use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::repo::{CatalogStore, UserStore, WatchlistUpdate};
use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, CatalogKind, GenreIds, NewCatalogItem, NewUser, User, Watchlist},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the migrations under `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct CatalogItemRow {
    id: Uuid,
    kind: String,
    title: String,
    description: String,
    release_date: String,
    genre_ids: Vec<i32>,
    popularity: i64,
}

impl TryFrom<CatalogItemRow> for CatalogItem {
    type Error = AppError;

    fn try_from(row: CatalogItemRow) -> AppResult<Self> {
        let kind = CatalogKind::parse(&row.kind)
            .ok_or_else(|| AppError::Internal(format!("Unknown catalog kind '{}'", row.kind)))?;
        let genre_ids = row
            .genre_ids
            .into_iter()
            .map(|id| {
                u32::try_from(id)
                    .map_err(|_| AppError::Internal(format!("Negative genre id {}", id)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(CatalogItem {
            id: row.id,
            kind,
            title: row.title,
            description: row.description,
            release_date: row.release_date,
            genre: GenreIds::from(genre_ids),
            popularity: row.popularity,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    movie_watchlist: Vec<Uuid>,
    show_watchlist: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            movie_watchlist: Watchlist::from(row.movie_watchlist),
            show_watchlist: Watchlist::from(row.show_watchlist),
            created_at: row.created_at,
        }
    }
}

/// Genre ids as stored in the `INTEGER[]` column
fn genre_columns(genre: &GenreIds) -> AppResult<Vec<i32>> {
    genre
        .as_slice()
        .iter()
        .map(|id| {
            i32::try_from(*id)
                .map_err(|_| AppError::Internal(format!("Genre id {} out of range", id)))
        })
        .collect()
}

const CATALOG_COLUMNS: &str = "id, kind, title, description, release_date, genre_ids, popularity";
const USER_COLUMNS: &str =
    "id, username, email, password_hash, movie_watchlist, show_watchlist, created_at";

// The watchlist column is chosen per kind; each statement only ever names one
// of the two fixed columns.
fn append_sql(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Movie => {
            "UPDATE users SET movie_watchlist = array_append(movie_watchlist, $2)
             WHERE id = $1 AND NOT ($2 = ANY(movie_watchlist))
             RETURNING movie_watchlist"
        }
        CatalogKind::Show => {
            "UPDATE users SET show_watchlist = array_append(show_watchlist, $2)
             WHERE id = $1 AND NOT ($2 = ANY(show_watchlist))
             RETURNING show_watchlist"
        }
    }
}

fn remove_sql(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Movie => {
            "UPDATE users SET movie_watchlist = array_remove(movie_watchlist, $2)
             WHERE id = $1 AND $2 = ANY(movie_watchlist)
             RETURNING movie_watchlist"
        }
        CatalogKind::Show => {
            "UPDATE users SET show_watchlist = array_remove(show_watchlist, $2)
             WHERE id = $1 AND $2 = ANY(show_watchlist)
             RETURNING show_watchlist"
        }
    }
}

/// Postgres-backed implementation of both repositories
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn user_exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn conditional_update(
        &self,
        sql: &'static str,
        user_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<WatchlistUpdate> {
        let updated: Option<Vec<Uuid>> = sqlx::query_scalar(sql)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(ids) => Ok(WatchlistUpdate::Applied(Watchlist::from(ids))),
            None if self.user_exists(user_id).await? => Ok(WatchlistUpdate::Rejected),
            None => Ok(WatchlistUpdate::UserMissing),
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn find_item(&self, kind: CatalogKind, id: Uuid) -> AppResult<Option<CatalogItem>> {
        let sql = format!(
            "SELECT {} FROM catalog_items WHERE kind = $1 AND id = $2",
            CATALOG_COLUMNS
        );
        let row: Option<CatalogItemRow> = sqlx::query_as(&sql)
            .bind(kind.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(CatalogItem::try_from).transpose()
    }

    async fn list_items(&self, kind: CatalogKind) -> AppResult<Vec<CatalogItem>> {
        let sql = format!(
            "SELECT {} FROM catalog_items WHERE kind = $1 ORDER BY seq",
            CATALOG_COLUMNS
        );
        let rows: Vec<CatalogItemRow> = sqlx::query_as(&sql)
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(CatalogItem::try_from).collect()
    }

    async fn find_items(&self, kind: CatalogKind, ids: &[Uuid]) -> AppResult<Vec<CatalogItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM catalog_items WHERE kind = $1 AND id = ANY($2)",
            CATALOG_COLUMNS
        );
        let rows: Vec<CatalogItemRow> = sqlx::query_as(&sql)
            .bind(kind.as_str())
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            let item = CatalogItem::try_from(row)?;
            by_id.insert(item.id, item);
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn count_items(&self, kind: CatalogKind) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items WHERE kind = $1")
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn seed_items(&self, kind: CatalogKind, items: Vec<NewCatalogItem>) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;

        // Serializes seeders of the same kind across processes until commit
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("seed:{}", kind))
            .execute(&mut *tx)
            .await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items WHERE kind = $1")
                .bind(kind.as_str())
                .fetch_one(&mut *tx)
                .await?;
        if existing > 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        let count = items.len();
        for item in items {
            let genre_ids = genre_columns(&item.genre)?;

            sqlx::query(
                "INSERT INTO catalog_items (id, kind, title, description, release_date, genre_ids, popularity)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::new_v4())
            .bind(kind.as_str())
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.release_date)
            .bind(&genre_ids)
            .bind(item.popularity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(count)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            USER_COLUMNS
        );
        let result: Result<UserRow, sqlx::Error> = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(User::from(row)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                "Username or email already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn append_to_watchlist(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<WatchlistUpdate> {
        self.conditional_update(append_sql(kind), user_id, item_id)
            .await
    }

    async fn remove_from_watchlist(
        &self,
        user_id: Uuid,
        kind: CatalogKind,
        item_id: Uuid,
    ) -> AppResult<WatchlistUpdate> {
        self.conditional_update(remove_sql(kind), user_id, item_id)
            .await
    }
}
