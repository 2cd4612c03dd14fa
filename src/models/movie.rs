use serde::{Deserialize, Serialize};

use super::MovieId;

/// A movie in the recommendation corpus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    /// External catalog identifier
    pub id: MovieId,
    pub title: String,
    /// Plot overview; empty when the catalog has none
    pub synopsis: String,
}

impl MovieRecord {
    pub fn new(id: MovieId, title: impl Into<String>, synopsis: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            synopsis: synopsis.into(),
        }
    }
}

/// Corpus listing entry returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
}

impl From<&MovieRecord> for MovieSummary {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
        }
    }
}

/// A ranked recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: MovieId,
    pub title: String,
    /// Cosine similarity to the liked movies, in [0, 1]
    pub score: f64,
}
