/// Movie catalog abstraction
///
/// The recommender only needs two things from the outside world: the identifiers on
/// a page of popular movies, and the details of one movie. Keeping them behind a
/// trait lets the corpus fetcher run against TMDB in production and against mocks
/// in tests.
use crate::{
    error::AppResult,
    models::{MovieId, MovieRecord},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Identifiers listed on one page of the popular-movies listing (pages start at 1)
    async fn popular_page(&self, page: u32) -> AppResult<Vec<MovieId>>;

    /// Full record for one movie
    async fn movie_details(&self, id: MovieId) -> AppResult<MovieRecord>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}
