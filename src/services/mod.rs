pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod catalog_filter;
pub mod genre_index;
pub mod providers;
pub mod search;
pub mod seeding;
pub mod watchlist;

pub use accounts::{AccountService, SigninRequest, SignupRequest};
pub use auth::TokenService;
pub use catalog::CatalogService;
pub use seeding::CatalogSeeder;
pub use watchlist::WatchlistManager;
