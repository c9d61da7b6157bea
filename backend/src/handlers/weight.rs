//! Cage weighing HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::HouseNumber;

use crate::error::AppResult;
use crate::services::weight::RecordWeighingInput;
use crate::services::WeightSampleService;
use crate::AppState;

#[derive(Deserialize)]
pub struct WeightQuery {
    pub house: Option<u8>,
}

/// List weight samples, optionally for one house
pub async fn list_weight_samples(
    State(state): State<AppState>,
    Query(query): Query<WeightQuery>,
) -> AppResult<impl IntoResponse> {
    let house = query.house.map(HouseNumber::new).transpose()?;
    let samples = WeightSampleService::new(state.store.clone()).samples(house)?;
    Ok(Json(serde_json::json!({ "samples": samples })))
}

/// Record every sampled layer of one cage
pub async fn record_weighing(
    State(state): State<AppState>,
    Json(input): Json<RecordWeighingInput>,
) -> AppResult<impl IntoResponse> {
    let _guard = state.write_lock.lock().await;
    let outcome = WeightSampleService::new(state.store.clone()).record_weighing(input)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
