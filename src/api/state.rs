use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::services::{RecommendationEngine, WatchlistStore};

/// Request-boundary limits
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub default_top_n: usize,
    pub max_top_n: usize,
    /// Distinct liked movies required before the engine is asked to rank
    pub min_liked: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            max_top_n: 50,
            min_liked: 5,
        }
    }
}

impl Limits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_top_n: config.default_top_n,
            min_liked: config.min_liked,
            ..Self::default()
        }
    }

    /// Applies the default and clamps to `1..=max_top_n`
    pub fn top_n(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_top_n)
            .clamp(1, self.max_top_n)
    }
}

/// Shared application state
///
/// The engine is read-only after startup; only the watchlist sits behind a lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub watchlist: Arc<RwLock<WatchlistStore>>,
    pub limits: Limits,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, watchlist: WatchlistStore, limits: Limits) -> Self {
        Self {
            engine: Arc::new(engine),
            watchlist: Arc::new(RwLock::new(watchlist)),
            limits,
        }
    }
}
