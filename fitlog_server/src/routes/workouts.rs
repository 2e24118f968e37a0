use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use fitlog_core::populate::{self, PopulatedWorkout};
use fitlog_core::{Workout, WorkoutInput};

use crate::error::ApiError;
use crate::routes::{Deleted, SearchQuery};
use crate::state::AppState;

pub async fn list_workouts(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<PopulatedWorkout>>, ApiError> {
    let Query(search) = query?;

    let mut workouts = state
        .with_store(populate::list_workouts)
        .await
        .map_err(ApiError::store("failed to load workouts"))?;

    if let Some(q) = search.term() {
        workouts.retain(|w| w.matches(q));
    }

    Ok(Json(workouts))
}

pub async fn get_workout(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<PopulatedWorkout>, ApiError> {
    let Path(id) = id?;
    let workout = state
        .with_store(move |store| populate::get_workout(store, id))
        .await
        .map_err(ApiError::store("failed to load workout"))?;
    Ok(Json(workout))
}

pub async fn create_workout(
    State(state): State<AppState>,
    payload: Result<Json<WorkoutInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    let Json(input) = payload?;
    let workout = state
        .with_store(move |store| store.create(input))
        .await
        .map_err(ApiError::store("failed to create workout"))?;

    tracing::info!(
        "Created workout {} with {} exercises",
        workout.name,
        workout.exercises.len()
    );
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn update_workout(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<WorkoutInput>, JsonRejection>,
) -> Result<Json<Workout>, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let workout = state
        .with_store(move |store| store.update(id, input))
        .await
        .map_err(ApiError::store("failed to update workout"))?;
    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    state
        .with_store(move |store| store.delete::<Workout>(id))
        .await
        .map_err(ApiError::store("failed to delete workout"))?;

    tracing::info!("Deleted workout {id}");
    Ok(Json(Deleted::new("Workout deleted")))
}
