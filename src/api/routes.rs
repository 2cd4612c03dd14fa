use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // Outermost, so the trace span already sees the request id
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Recommendations
        .route("/recommend", post(handlers::recommend_for_ids))
        .route("/recommend/title", get(handlers::recommend_for_title))
        .route("/movies", get(handlers::list_movies))
        // Watchlist
        .route("/watchlist", post(handlers::add_to_watchlist))
        .route("/watchlist/:user_id", get(handlers::get_watchlist))
        .route(
            "/watchlist/:user_id/movies/:movie_id",
            delete(handlers::remove_from_watchlist),
        )
        .route(
            "/watchlist/:user_id/recommendations",
            get(handlers::watchlist_recommendations),
        )
}
