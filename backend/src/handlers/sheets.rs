//! Sheet maintenance and export handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use shared::SheetName;

use crate::error::AppResult;
use crate::services::maintenance::{NewRecord, RecordChanges};
use crate::services::{MaintenanceService, ReportingService};
use crate::AppState;

fn maintenance_service(state: &AppState) -> MaintenanceService {
    MaintenanceService::new(state.store.clone(), state.config.flock.default_initial_stock)
}

/// Row counts of every sheet
pub async fn get_overview(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let counts = ReportingService::new(state.store.clone()).overview()?;
    Ok(Json(serde_json::json!({ "sheets": counts })))
}

/// List every row of a sheet
pub async fn list_sheet_records(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
) -> AppResult<impl IntoResponse> {
    let sheet: SheetName = sheet.parse()?;
    let listing = maintenance_service(&state).list(sheet)?;
    Ok(Json(listing))
}

/// Insert a row on a sheet
pub async fn insert_sheet_record(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
    Json(record): Json<NewRecord>,
) -> AppResult<impl IntoResponse> {
    let sheet: SheetName = sheet.parse()?;
    let _guard = state.write_lock.lock().await;
    let outcome = maintenance_service(&state).insert(sheet, record)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Update a row by its position on the sheet
pub async fn update_sheet_record(
    State(state): State<AppState>,
    Path((sheet, index)): Path<(String, usize)>,
    Json(changes): Json<RecordChanges>,
) -> AppResult<impl IntoResponse> {
    let sheet: SheetName = sheet.parse()?;
    let _guard = state.write_lock.lock().await;
    let outcome = maintenance_service(&state).update(sheet, index, changes)?;
    Ok(Json(outcome))
}

/// Delete a row by its position on the sheet
pub async fn delete_sheet_record(
    State(state): State<AppState>,
    Path((sheet, index)): Path<(String, usize)>,
) -> AppResult<impl IntoResponse> {
    let sheet: SheetName = sheet.parse()?;
    let _guard = state.write_lock.lock().await;
    let outcome = maintenance_service(&state).delete(sheet, index)?;
    Ok(Json(outcome))
}

/// Download a sheet as CSV
pub async fn export_sheet(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
) -> AppResult<impl IntoResponse> {
    let sheet: SheetName = sheet.parse()?;
    let csv = ReportingService::new(state.store.clone()).export_sheet(sheet)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", sheet),
            ),
        ],
        csv,
    ))
}
