use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CatalogKind, Watchlist};

/// A registered account with its two watchlists
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub movie_watchlist: Watchlist,
    pub show_watchlist: Watchlist,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(new_user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            movie_watchlist: Watchlist::new(),
            show_watchlist: Watchlist::new(),
            created_at: Utc::now(),
        }
    }

    pub fn watchlist(&self, kind: CatalogKind) -> &Watchlist {
        match kind {
            CatalogKind::Movie => &self.movie_watchlist,
            CatalogKind::Show => &self.show_watchlist,
        }
    }

    pub fn watchlist_mut(&mut self, kind: CatalogKind) -> &mut Watchlist {
        match kind {
            CatalogKind::Movie => &mut self.movie_watchlist,
            CatalogKind::Show => &mut self.show_watchlist,
        }
    }
}

/// Signup data after the password has been hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// The part of a user that is safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub movie_watch_list: Watchlist,
    pub show_watch_list: Watchlist,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            movie_watch_list: user.movie_watchlist.clone(),
            show_watch_list: user.show_watchlist.clone(),
            created_at: user.created_at,
        }
    }
}
