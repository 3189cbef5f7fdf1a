//! Router assembly.

use crate::handlers::{actors, cinema_halls, genres, movie_sessions, movies, orders};
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the application with every resource under `/api/cinema`
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/cinema", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/genres", get(genres::list).post(genres::create))
        .route(
            "/genres/:id",
            get(genres::retrieve)
                .put(genres::update)
                .patch(genres::partial_update)
                .delete(genres::destroy),
        )
        .route("/actors", get(actors::list).post(actors::create))
        .route(
            "/actors/:id",
            get(actors::retrieve)
                .put(actors::update)
                .patch(actors::partial_update)
                .delete(actors::destroy),
        )
        .route("/cinema_halls", get(cinema_halls::list).post(cinema_halls::create))
        .route(
            "/cinema_halls/:id",
            get(cinema_halls::retrieve)
                .put(cinema_halls::update)
                .patch(cinema_halls::partial_update)
                .delete(cinema_halls::destroy),
        )
        .route("/movies", get(movies::list).post(movies::create))
        .route(
            "/movies/:id",
            get(movies::retrieve)
                .put(movies::update)
                .patch(movies::partial_update)
                .delete(movies::destroy),
        )
        .route(
            "/movie_sessions",
            get(movie_sessions::list).post(movie_sessions::create),
        )
        .route(
            "/movie_sessions/:id",
            get(movie_sessions::retrieve)
                .put(movie_sessions::update)
                .patch(movie_sessions::partial_update)
                .delete(movie_sessions::destroy),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:id", get(orders::retrieve))
}
