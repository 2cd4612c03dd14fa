pub mod catalog;
pub mod corpus;
pub mod recommender;
pub mod watchlist;

pub use catalog::{MovieCatalog, TmdbCatalog};
pub use recommender::RecommendationEngine;
pub use watchlist::{AddOutcome, WatchlistStore};
