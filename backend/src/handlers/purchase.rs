//! Feed purchase HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::HouseNumber;
use validator::Validate;

use super::today;
use crate::error::AppResult;
use crate::services::purchase::RecordPurchaseInput;
use crate::services::{PurchaseService, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct PurchaseQuery {
    pub house: Option<u8>,
}

#[derive(Deserialize, Validate)]
pub struct RecentPurchaseQuery {
    pub house: u8,
    #[validate(range(min = 1, max = 3650, message = "Days must be between 1 and 3650"))]
    pub days: Option<u32>,
    pub today: Option<NaiveDate>,
}

/// List purchases in insertion order
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<PurchaseQuery>,
) -> AppResult<impl IntoResponse> {
    let house = query.house.map(HouseNumber::new).transpose()?;
    let purchases = PurchaseService::new(state.store.clone()).purchases(house)?;
    Ok(Json(serde_json::json!({ "purchases": purchases })))
}

/// Record a feed purchase
pub async fn record_purchase(
    State(state): State<AppState>,
    Json(input): Json<RecordPurchaseInput>,
) -> AppResult<impl IntoResponse> {
    let _guard = state.write_lock.lock().await;
    let outcome = PurchaseService::new(state.store.clone()).record(input)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Recent purchases of one house with the total bought
pub async fn get_recent_purchases(
    State(state): State<AppState>,
    Query(query): Query<RecentPurchaseQuery>,
) -> AppResult<impl IntoResponse> {
    let house = HouseNumber::new(query.house)?;
    query.validate()?;
    let days = query
        .days
        .unwrap_or(state.config.reporting.purchase_window_days);
    let recent = ReportingService::new(state.store.clone()).recent_purchases(
        house,
        days,
        query.today.unwrap_or_else(today),
    )?;
    Ok(Json(recent))
}
