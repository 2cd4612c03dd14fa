use std::collections::HashSet;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        MovieId, MovieSummary, NewWatchlistEntry, RecommendForIdsRequest, RecommendForTitleQuery,
        RecommendationResponse, TopNQuery, UserId, WatchlistEntry,
    },
    services::AddOutcome,
};

use super::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "corpus_size": state.engine.corpus_size(),
        })),
    )
}

/// Rejects liked sets smaller than the configured minimum
fn require_min_liked(liked_ids: &[MovieId], min_liked: usize) -> AppResult<()> {
    let distinct = liked_ids.iter().collect::<HashSet<_>>().len();
    if distinct < min_liked {
        return Err(AppError::InvalidInput(format!(
            "At least {} liked movies are required, got {}",
            min_liked, distinct
        )));
    }
    Ok(())
}

/// Recommendations for a set of liked movie ids
pub async fn recommend_for_ids(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    request: Result<Json<RecommendForIdsRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = request?;
    require_min_liked(&request.liked_ids, state.limits.min_liked)?;
    let top_n = state.limits.top_n(request.top_n);

    let recommendations = state.engine.recommend_for_ids(&request.liked_ids, top_n)?;

    tracing::info!(
        request_id = %request_id,
        liked = request.liked_ids.len(),
        top_n,
        returned = recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(RecommendationResponse { recommendations }))
}

/// Recommendations for a single movie title
pub async fn recommend_for_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendForTitleQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(query) = query?;
    let top_n = state.limits.top_n(query.top_n);
    let recommendations = state.engine.recommend(&query.title, top_n)?;

    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        returned = recommendations.len(),
        "Title recommendations served"
    );

    Ok(Json(RecommendationResponse { recommendations }))
}

/// Lists the movies in the recommendation corpus
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<MovieSummary>> {
    Json(state.engine.movies())
}

/// Adds a movie to a user's watchlist
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    request: Result<Json<NewWatchlistEntry>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = request?;
    let outcome = state.watchlist.write().await.add(request)?;

    let response = match outcome {
        AddOutcome::Added(entry) => (StatusCode::CREATED, Json(json!(entry))).into_response(),
        AddOutcome::AlreadyPresent(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Movie is already in the watchlist" })),
        )
            .into_response(),
    };

    Ok(response)
}

/// Gets a user's watchlist
pub async fn get_watchlist(
    State(state): State<AppState>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    let Path(user_id) = user_id?;
    Ok(Json(state.watchlist.read().await.list(user_id)))
}

/// Removes a movie from a user's watchlist
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    ids: Result<Path<(UserId, MovieId)>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path((user_id, movie_id)) = ids?;
    if state.watchlist.write().await.remove(user_id, movie_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Movie {} is not in the watchlist of user {}",
            movie_id, user_id
        )))
    }
}

/// Recommendations seeded from a user's watchlist
pub async fn watchlist_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user_id: Result<Path<UserId>, PathRejection>,
    query: Result<Query<TopNQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Path(user_id) = user_id?;
    let Query(query) = query?;
    let liked_ids = state.watchlist.read().await.movie_ids(user_id);
    require_min_liked(&liked_ids, state.limits.min_liked)?;

    let top_n = state.limits.top_n(query.top_n);
    let recommendations = state.engine.recommend_for_ids(&liked_ids, top_n)?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        liked = liked_ids.len(),
        returned = recommendations.len(),
        "Watchlist recommendations served"
    );

    Ok(Json(RecommendationResponse { recommendations }))
}
