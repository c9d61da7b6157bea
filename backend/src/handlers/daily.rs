//! Daily record HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{has_duplicate, HouseNumber};
use validator::Validate;

use super::today;
use crate::error::AppResult;
use crate::services::daily::RecordDailyInput;
use crate::services::{DailyRecordService, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize, Validate)]
pub struct RecentQuery {
    #[validate(range(min = 1, max = 3650, message = "Days must be between 1 and 3650"))]
    pub days: Option<u32>,
    /// Defaults to the server's local date
    pub today: Option<NaiveDate>,
}

fn daily_service(state: &AppState) -> DailyRecordService {
    DailyRecordService::new(state.store.clone(), state.config.flock.default_initial_stock)
}

/// Age a new record on `date` would be stamped with
pub async fn get_age(
    State(state): State<AppState>,
    Path(house): Path<String>,
    Query(query): Query<DateQuery>,
) -> AppResult<impl IntoResponse> {
    let house: HouseNumber = house.parse()?;
    let preview = daily_service(&state).preview(house, query.date)?;
    tracing::debug!("Age preview for house {} on {}: {}", house, query.date, preview.resolution.age);
    Ok(Json(preview))
}

/// Informational duplicate check for the entry form
pub async fn check_duplicates(
    State(state): State<AppState>,
    Path(house): Path<String>,
    Query(query): Query<DateQuery>,
) -> AppResult<impl IntoResponse> {
    let house: HouseNumber = house.parse()?;
    let records = daily_service(&state).records(house)?;
    let (duplicate, matches) = has_duplicate(&records, query.date);

    Ok(Json(serde_json::json!({
        "house": house,
        "date": query.date,
        "duplicate": duplicate,
        "records": matches,
    })))
}

/// List a house's daily records in stored order
pub async fn list_daily_records(
    State(state): State<AppState>,
    Path(house): Path<String>,
) -> AppResult<impl IntoResponse> {
    let house: HouseNumber = house.parse()?;
    let records = daily_service(&state).records(house)?;
    Ok(Json(serde_json::json!({ "house": house, "records": records })))
}

/// Record a new day for a house
pub async fn record_daily(
    State(state): State<AppState>,
    Path(house): Path<String>,
    Json(input): Json<RecordDailyInput>,
) -> AppResult<impl IntoResponse> {
    let house: HouseNumber = house.parse()?;
    let _guard = state.write_lock.lock().await;
    let outcome = daily_service(&state).record(house, input)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Recent daily data with its summary
pub async fn get_recent_daily(
    State(state): State<AppState>,
    Path(house): Path<String>,
    Query(query): Query<RecentQuery>,
) -> AppResult<impl IntoResponse> {
    let house: HouseNumber = house.parse()?;
    query.validate()?;
    let days = query.days.unwrap_or(state.config.reporting.recent_days);
    let recent = ReportingService::new(state.store.clone()).recent_daily(
        house,
        days,
        query.today.unwrap_or_else(today),
    )?;
    Ok(Json(recent))
}
