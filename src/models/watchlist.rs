use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MovieId, UserId};

/// Kind of media saved to a watchlist
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

/// Body of `POST /api/v1/watchlist`
#[derive(Debug, Clone, Deserialize)]
pub struct NewWatchlistEntry {
    pub user_id: UserId,
    pub movie_id: MovieId,
    #[serde(default)]
    pub movie_title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
}

/// A movie saved by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub movie_title: String,
    pub poster_path: Option<String>,
    pub media_type: MediaType,
    pub added_at: DateTime<Utc>,
}

impl From<NewWatchlistEntry> for WatchlistEntry {
    fn from(entry: NewWatchlistEntry) -> Self {
        Self {
            user_id: entry.user_id,
            movie_id: entry.movie_id,
            movie_title: entry.movie_title,
            poster_path: entry.poster_path,
            media_type: entry.media_type,
            added_at: Utc::now(),
        }
    }
}
