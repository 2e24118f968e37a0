use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use fitlog_core::exertion::{self, BRZYCKI_REP_LIMIT};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RpeRequest {
    pub weight: f64,
    pub reps: u32,
    pub one_rep_max: f64,
}

#[derive(Debug, Serialize)]
pub struct RpeResponse {
    pub rpe: f64,
    pub percentage: f64,
    pub bucket: u32,
    pub description: &'static str,
}

pub async fn rpe(
    payload: Result<Json<RpeRequest>, JsonRejection>,
) -> Result<Json<RpeResponse>, ApiError> {
    let Json(req) = payload?;

    let estimate = exertion::rpe_estimate(req.weight, req.reps, req.one_rep_max).ok_or_else(|| {
        ApiError::BadRequest("weight and one_rep_max must be positive and reps at least 1".into())
    })?;

    Ok(Json(RpeResponse {
        rpe: estimate.rpe,
        percentage: estimate.percentage,
        bucket: estimate.bucket,
        description: exertion::describe_rpe(estimate.rpe),
    }))
}

#[derive(Debug, Deserialize)]
pub struct OneRepMaxRequest {
    pub weight: f64,
    pub reps: u32,
}

#[derive(Debug, Serialize)]
pub struct OneRepMaxResponse {
    pub one_rep_max: f64,
}

pub async fn one_rep_max(
    payload: Result<Json<OneRepMaxRequest>, JsonRejection>,
) -> Result<Json<OneRepMaxResponse>, ApiError> {
    let Json(req) = payload?;

    let one_rep_max = exertion::estimate_one_rep_max(req.weight, req.reps).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "weight must be positive and reps between 1 and {}",
            BRZYCKI_REP_LIMIT - 1
        ))
    })?;

    Ok(Json(OneRepMaxResponse { one_rep_max }))
}
