mod catalog;
mod genre;
mod user;
mod watchlist;

pub use catalog::{CatalogItem, CatalogKind, NewCatalogItem};
pub use genre::GenreIds;
pub use user::{NewUser, User, UserProfile};
pub use watchlist::Watchlist;
