use serde::{Deserialize, Serialize};

pub mod movie;
pub mod watchlist;

pub use movie::{MovieRecord, MovieSummary, Recommendation};
pub use watchlist::{NewWatchlistEntry, WatchlistEntry};

/// External catalog movie identifier (TMDB ID)
pub type MovieId = i64;

/// Identifier of the user owning a watchlist
pub type UserId = i64;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response of `GET /movie/popular`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    pub results: Vec<TmdbListing>,
}

/// Entry of a listing page; only the identifier is needed
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbListing {
    pub id: MovieId,
}

/// Response of `GET /movie/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: MovieId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl From<TmdbMovieDetails> for MovieRecord {
    fn from(details: TmdbMovieDetails) -> Self {
        MovieRecord {
            id: details.id,
            title: details.title.unwrap_or_default(),
            synopsis: details.overview.unwrap_or_default(),
        }
    }
}

// ============================================================================
// Recommendation API Types
// ============================================================================

/// Body of `POST /api/v1/recommend`
#[derive(Debug, Deserialize)]
pub struct RecommendForIdsRequest {
    pub liked_ids: Vec<MovieId>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Query of `GET /api/v1/recommend/title`
#[derive(Debug, Deserialize)]
pub struct RecommendForTitleQuery {
    pub title: String,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Optional `top_n` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct TopNQuery {
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
}
