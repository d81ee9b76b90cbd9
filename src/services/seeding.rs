use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{CatalogKind, NewCatalogItem},
    services::providers::CatalogProvider,
};

/// Populates the catalog from the provider the first time each kind is read.
///
/// Each kind has its own once-cell: the first caller runs the seed while
/// concurrent callers wait on the same attempt. A failed attempt leaves the
/// cell empty so a later request tries again.
pub struct CatalogSeeder {
    store: Arc<dyn CatalogStore>,
    provider: Arc<dyn CatalogProvider>,
    pages: u32,
    movies: OnceCell<()>,
    shows: OnceCell<()>,
}

impl CatalogSeeder {
    pub fn new(store: Arc<dyn CatalogStore>, provider: Arc<dyn CatalogProvider>, pages: u32) -> Self {
        Self {
            store,
            provider,
            pages: pages.max(1),
            movies: OnceCell::new(),
            shows: OnceCell::new(),
        }
    }

    fn cell(&self, kind: CatalogKind) -> &OnceCell<()> {
        match kind {
            CatalogKind::Movie => &self.movies,
            CatalogKind::Show => &self.shows,
        }
    }

    /// Makes sure `kind` has been seeded, seeding it now if needed
    pub async fn ensure_seeded(&self, kind: CatalogKind) -> AppResult<()> {
        self.cell(kind)
            .get_or_try_init(|| self.seed(kind))
            .await
            .map(|_| ())
    }

    async fn seed(&self, kind: CatalogKind) -> AppResult<()> {
        if self.store.count_items(kind).await? > 0 {
            tracing::debug!(kind = %kind, "Catalog already populated");
            return Ok(());
        }

        // Every page is fetched before anything is written, so a failing page
        // leaves the store empty.
        let mut items: Vec<NewCatalogItem> = Vec::new();
        for page in 1..=self.pages {
            let titles = self.provider.fetch_top_rated(kind, page).await?;
            items.extend(titles.into_iter().map(NewCatalogItem::from));
        }

        let stored = self.store.seed_items(kind, items).await?;
        tracing::info!(
            kind = %kind,
            provider = self.provider.name(),
            stored,
            "Seeded catalog"
        );

        Ok(())
    }
}
