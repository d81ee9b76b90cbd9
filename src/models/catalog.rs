use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use super::GenreIds;

/// The two catalog collections. Movies and shows share one record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Movie,
    Show,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 2] = [CatalogKind::Movie, CatalogKind::Show];

    /// Stable lowercase name, used for storage and cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Movie => "movie",
            CatalogKind::Show => "show",
        }
    }

    /// Capitalized name for user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Movie => "Movie",
            CatalogKind::Show => "Show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(CatalogKind::Movie),
            "show" => Some(CatalogKind::Show),
            _ => None,
        }
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie or show stored in the local catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: Uuid,
    pub kind: CatalogKind,
    pub title: String,
    pub description: String,
    /// Release (or first air) date as the provider formats it, e.g. "1994-09-23"
    pub release_date: String,
    pub genre: GenreIds,
    /// Provider vote count
    #[serde(rename = "total_votes")]
    pub popularity: i64,
}

/// A catalog record before it has been assigned an identity
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogItem {
    pub title: String,
    pub description: String,
    pub release_date: String,
    pub genre: GenreIds,
    pub popularity: i64,
}

impl NewCatalogItem {
    pub fn into_item(self, kind: CatalogKind) -> CatalogItem {
        CatalogItem {
            id: Uuid::new_v4(),
            kind,
            title: self.title,
            description: self.description,
            release_date: self.release_date,
            genre: self.genre,
            popularity: self.popularity,
        }
    }
}
