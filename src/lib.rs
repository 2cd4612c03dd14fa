//! Movie watchlist and content-based recommendation service.
//!
//! At startup the popular-movie corpus is pulled from TMDB, synopses are turned
//! into TF-IDF vectors, and pairwise cosine similarity is precomputed. The HTTP
//! API then ranks unseen movies against a caller's liked set.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
