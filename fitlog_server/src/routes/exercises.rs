use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use fitlog_core::{Exercise, ExerciseInput};

use crate::error::ApiError;
use crate::routes::{Deleted, SearchQuery};
use crate::state::AppState;

pub async fn list_exercises(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let Query(search) = query?;

    let mut exercises = state
        .with_store(|store| store.list::<Exercise>())
        .await
        .map_err(ApiError::store("failed to load exercises"))?;

    if let Some(q) = search.term() {
        exercises.retain(|e| e.matches(q));
    }

    Ok(Json(exercises))
}

pub async fn get_exercise(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Exercise>, ApiError> {
    let Path(id) = id?;
    let exercise = state
        .with_store(move |store| store.get::<Exercise>(id))
        .await
        .map_err(ApiError::store("failed to load exercise"))?;
    Ok(Json(exercise))
}

pub async fn create_exercise(
    State(state): State<AppState>,
    payload: Result<Json<ExerciseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    let Json(input) = payload?;
    let exercise = state
        .with_store(move |store| store.create(input))
        .await
        .map_err(ApiError::store("failed to save exercise"))?;

    tracing::info!("Created exercise {} ({})", exercise.name, exercise.id);
    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn update_exercise(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ExerciseInput>, JsonRejection>,
) -> Result<Json<Exercise>, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    replace(state, id, input).await
}

/// `PUT /api/exercises` with the id carried in the body
pub async fn update_exercise_by_body(
    State(state): State<AppState>,
    payload: Result<Json<ExerciseInput>, JsonRejection>,
) -> Result<Json<Exercise>, ApiError> {
    let Json(input) = payload?;
    let id = input
        .id
        .ok_or_else(|| ApiError::BadRequest("id: is required".into()))?;
    replace(state, id, input).await
}

async fn replace(
    state: AppState,
    id: Uuid,
    input: ExerciseInput,
) -> Result<Json<Exercise>, ApiError> {
    let exercise = state
        .with_store(move |store| store.update(id, input))
        .await
        .map_err(ApiError::store("failed to update exercise"))?;
    Ok(Json(exercise))
}

pub async fn delete_exercise(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    remove(state, id).await
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    id: Option<String>,
}

/// `DELETE /api/exercises?id=...`
pub async fn delete_exercise_by_query(
    State(state): State<AppState>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Query(query) = query?;
    let raw = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("id: is required".into()))?;
    let id = Uuid::parse_str(raw.trim())
        .map_err(|e| ApiError::BadRequest(format!("id: {e}")))?;
    remove(state, id).await
}

async fn remove(state: AppState, id: Uuid) -> Result<Json<Deleted>, ApiError> {
    state
        .with_store(move |store| store.delete::<Exercise>(id))
        .await
        .map_err(ApiError::store("failed to delete exercise"))?;

    tracing::info!("Deleted exercise {id}");
    Ok(Json(Deleted::new("Exercise deleted")))
}
