//! Route definitions for the Poultry House Records API

use axum::{
    routing::{get, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Daily records, one sheet per house
        .nest("/houses", house_routes())
        // Cage weighings
        .nest("/weights", weight_routes())
        // Feed purchases
        .nest("/purchases", purchase_routes())
        // Row-level maintenance on any sheet
        .nest("/sheets", sheet_routes())
}

/// Daily record routes
fn house_routes() -> Router<AppState> {
    Router::new()
        .route("/:house/age", get(handlers::get_age))
        .route("/:house/duplicates", get(handlers::check_duplicates))
        .route(
            "/:house/records",
            get(handlers::list_daily_records).post(handlers::record_daily),
        )
        .route("/:house/recent", get(handlers::get_recent_daily))
}

/// Weight sample routes
fn weight_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_weight_samples).post(handlers::record_weighing),
    )
}

/// Feed purchase routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::record_purchase),
        )
        .route("/recent", get(handlers::get_recent_purchases))
}

/// Sheet maintenance routes
fn sheet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_overview))
        .route(
            "/:sheet/records",
            get(handlers::list_sheet_records).post(handlers::insert_sheet_record),
        )
        .route(
            "/:sheet/records/:index",
            put(handlers::update_sheet_record).delete(handlers::delete_sheet_record),
        )
        .route("/:sheet/export", get(handlers::export_sheet))
}
