/// External catalog feed
///
/// The local catalog is populated once per kind from an upstream provider's
/// top-rated listing. Providers only need to hand back one page at a time;
/// paging and storage are handled by the seeder.
use crate::{
    error::AppResult,
    models::{CatalogKind, GenreIds, NewCatalogItem},
};

pub mod tmdb;

/// One title as delivered by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTitle {
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub genre_ids: Vec<u32>,
    pub vote_count: i64,
}

impl From<ProviderTitle> for NewCatalogItem {
    fn from(title: ProviderTitle) -> Self {
        NewCatalogItem {
            title: title.title,
            description: title.overview,
            release_date: title.release_date,
            genre: GenreIds::from(title.genre_ids),
            popularity: title.vote_count,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetches one page (1-based) of the top-rated listing for `kind`
    async fn fetch_top_rated(&self, kind: CatalogKind, page: u32) -> AppResult<Vec<ProviderTitle>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
