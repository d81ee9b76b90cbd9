use std::sync::Arc;

use crate::{
    config::Config,
    db::{Cache, CatalogStore, UserStore},
    error::AppResult,
    services::{
        providers::CatalogProvider, AccountService, CatalogSeeder, CatalogService, TokenService,
        WatchlistManager,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub watchlists: Arc<WatchlistManager>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wires the services over one store that holds both catalog and users
    pub fn new<S>(
        store: Arc<S>,
        provider: Arc<dyn CatalogProvider>,
        cache: Option<Cache>,
        config: &Config,
    ) -> AppResult<Self>
    where
        S: CatalogStore + UserStore + 'static,
    {
        let catalog_store: Arc<dyn CatalogStore> = store.clone();
        let user_store: Arc<dyn UserStore> = store;

        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl_secs)?);
        let seeder = Arc::new(CatalogSeeder::new(
            catalog_store.clone(),
            provider,
            config.tmdb_pages,
        ));

        Ok(Self {
            catalog: Arc::new(CatalogService::new(
                catalog_store.clone(),
                seeder,
                cache,
                config.cache_ttl_secs,
            )),
            watchlists: Arc::new(WatchlistManager::new(catalog_store, user_store.clone())),
            accounts: Arc::new(AccountService::new(
                user_store,
                tokens.clone(),
                config.bcrypt_cost,
            )),
            tokens,
        })
    }
}
