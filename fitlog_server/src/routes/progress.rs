use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use fitlog_core::populate::{self, PopulatedProgress, References};
use fitlog_core::{ProgressInput, WorkoutProgress};

use crate::error::ApiError;
use crate::routes::Deleted;
use crate::state::AppState;

pub async fn list_progress(
    State(state): State<AppState>,
) -> Result<Json<Vec<PopulatedProgress>>, ApiError> {
    let entries = state
        .with_store(populate::list_progress)
        .await
        .map_err(ApiError::store("failed to load progress"))?;
    Ok(Json(entries))
}

pub async fn get_progress(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<PopulatedProgress>, ApiError> {
    let Path(id) = id?;
    let entry = state
        .with_store(move |store| populate::get_progress(store, id))
        .await
        .map_err(ApiError::store("failed to load session"))?;
    Ok(Json(entry))
}

pub async fn create_progress(
    State(state): State<AppState>,
    payload: Result<Json<ProgressInput>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkoutProgress>), ApiError> {
    let Json(input) = payload?;
    let entry = state
        .with_store(move |store| store.create(input))
        .await
        .map_err(ApiError::store("failed to log session"))?;

    tracing::info!("Logged session {} on {}", entry.id, entry.date);
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_progress(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ProgressInput>, JsonRejection>,
) -> Result<Json<PopulatedProgress>, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let entry = state
        .with_store(move |store| {
            let updated = store.update(id, input)?;
            Ok(References::load(store)?.populate_progress(updated))
        })
        .await
        .map_err(ApiError::store("failed to update session"))?;
    Ok(Json(entry))
}

pub async fn delete_progress(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    state
        .with_store(move |store| store.delete::<WorkoutProgress>(id))
        .await
        .map_err(ApiError::store("failed to delete session"))?;

    tracing::info!("Deleted session {id}");
    Ok(Json(Deleted::new("Session deleted")))
}
