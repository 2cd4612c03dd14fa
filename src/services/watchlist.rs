use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, NewWatchlistEntry, UserId, WatchlistEntry},
};

/// Outcome of adding a movie to a watchlist
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(WatchlistEntry),
    AlreadyPresent(WatchlistEntry),
}

/// In-memory per-user watchlists, bounded both in users and in entries per user
///
/// Users whose list becomes empty are dropped and free their slot.
#[derive(Debug)]
pub struct WatchlistStore {
    entries: HashMap<UserId, Vec<WatchlistEntry>>,
    max_users: usize,
    max_entries_per_user: usize,
}

impl WatchlistStore {
    pub fn new(max_users: usize, max_entries_per_user: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_users,
            max_entries_per_user,
        }
    }

    pub fn user_count(&self) -> usize {
        self.entries.len()
    }

    pub fn add(&mut self, entry: NewWatchlistEntry) -> AppResult<AddOutcome> {
        if !self.entries.contains_key(&entry.user_id) && self.entries.len() >= self.max_users {
            return Err(AppError::InvalidInput(format!(
                "Watchlist store is full ({} users)",
                self.max_users
            )));
        }

        let max_entries = self.max_entries_per_user;
        let list = self.entries.entry(entry.user_id).or_default();

        if let Some(existing) = list.iter().find(|e| e.movie_id == entry.movie_id) {
            return Ok(AddOutcome::AlreadyPresent(existing.clone()));
        }

        if list.len() >= max_entries {
            if list.is_empty() {
                self.entries.remove(&entry.user_id);
            }
            return Err(AppError::InvalidInput(format!(
                "Watchlist is full ({} entries)",
                max_entries
            )));
        }

        let entry = WatchlistEntry::from(entry);
        list.push(entry.clone());

        tracing::debug!(
            user_id = entry.user_id,
            movie_id = entry.movie_id,
            size = list.len(),
            "Watchlist entry added"
        );

        Ok(AddOutcome::Added(entry))
    }

    /// Entries in insertion order; unknown users have an empty list
    pub fn list(&self, user_id: UserId) -> Vec<WatchlistEntry> {
        self.entries.get(&user_id).cloned().unwrap_or_default()
    }

    pub fn movie_ids(&self, user_id: UserId) -> Vec<MovieId> {
        self.entries
            .get(&user_id)
            .map(|list| list.iter().map(|e| e.movie_id).collect())
            .unwrap_or_default()
    }

    pub fn remove(&mut self, user_id: UserId, movie_id: MovieId) -> bool {
        let Some(list) = self.entries.get_mut(&user_id) else {
            return false;
        };

        let before = list.len();
        list.retain(|e| e.movie_id != movie_id);
        let removed = list.len() != before;

        if list.is_empty() {
            self.entries.remove(&user_id);
        }

        removed
    }
}
