#![forbid(unsafe_code)]

//! HTTP API for FitLog.
//!
//! JSON routes over the exercise catalog, workout plans, logged sessions and
//! the exertion calculators. Handlers share one [`fitlog_core::Store`]
//! through [`AppState`].

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Exercise catalog
        .route(
            "/api/exercises",
            get(routes::exercises::list_exercises)
                .post(routes::exercises::create_exercise)
                .put(routes::exercises::update_exercise_by_body)
                .delete(routes::exercises::delete_exercise_by_query),
        )
        .route(
            "/api/exercises/{id}",
            get(routes::exercises::get_exercise)
                .put(routes::exercises::update_exercise)
                .delete(routes::exercises::delete_exercise),
        )
        // Workout plans
        .route(
            "/api/workouts",
            get(routes::workouts::list_workouts).post(routes::workouts::create_workout),
        )
        .route(
            "/api/workouts/{id}",
            get(routes::workouts::get_workout)
                .put(routes::workouts::update_workout)
                .delete(routes::workouts::delete_workout),
        )
        // Logged sessions
        .route(
            "/api/progress",
            get(routes::progress::list_progress).post(routes::progress::create_progress),
        )
        .route(
            "/api/progress/{id}",
            get(routes::progress::get_progress)
                .put(routes::progress::update_progress)
                .delete(routes::progress::delete_progress),
        )
        // Calculators
        .route("/api/calculators/rpe", post(routes::calculators::rpe))
        .route(
            "/api/calculators/one-rep-max",
            post(routes::calculators::one_rep_max),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(state: AppState, addr: &str) -> fitlog_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
