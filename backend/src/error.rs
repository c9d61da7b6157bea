//! Error handling for the Poultry House Records server
//!
//! Provides consistent error responses in English and Chinese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    HouseNumber, RecordError, MAX_DAILY_FEED_KG, MAX_SAMPLE_COUNT, MAX_SAMPLE_WEIGHT_KG,
};
use thiserror::Error;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_zh: String,
    },

    #[error("Duplicate entry: house {house} already has a record on {date}")]
    DuplicateEntry { house: HouseNumber, date: NaiveDate },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Row `index` of `sheet` does not exist
    pub fn record_not_found(sheet: impl std::fmt::Display, index: usize) -> Self {
        AppError::NotFound(format!("Record {} of sheet {}", index, sheet))
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        let message_zh = match &err {
            RecordError::DuplicateDate { house, date } => {
                return AppError::DuplicateEntry {
                    house: *house,
                    date: *date,
                }
            }
            RecordError::HouseOutOfRange(n) => format!("鸡舍编号 {} 超出范围 1-16", n),
            RecordError::NegativeFeed => "耗料不能为负数".to_string(),
            RecordError::ExcessiveFeed => format!("单日耗料不能超过 {}kg", MAX_DAILY_FEED_KG),
            RecordError::EmptySample => "样本数量至少为 1".to_string(),
            RecordError::OversizedSample => format!("样本数量不能超过 {}", MAX_SAMPLE_COUNT),
            RecordError::NegativeWeight => "总重量不能为负数".to_string(),
            RecordError::ExcessiveWeight => format!("总重量不能超过 {}kg", MAX_SAMPLE_WEIGHT_KG),
            RecordError::UnknownLayer(layer) => format!("未知层数: {}", layer),
            RecordError::UnknownFeedType(code) => format!("未知料号: {}", code),
            RecordError::UnknownSheet(sheet) => format!("未知数据表: {}", sheet),
        };
        AppError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
            message_zh,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let Some((field, field_errors)) = fields.into_iter().next() else {
            return AppError::Validation {
                field: String::new(),
                message: "Invalid input".to_string(),
                message_zh: "输入数据无效".to_string(),
            };
        };
        let message = field_errors
            .first()
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid value for {}", field));

        AppError::Validation {
            field: field.to_string(),
            message_zh: format!("输入数据无效: {}", message),
            message,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_zh: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_zh,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_zh: message_zh.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry { house, date } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("House {} already has a record on {}", house, date),
                    message_zh: format!("鸡舍{}在{}已有数据记录", house, date),
                    field: Some("date".to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_zh: format!("未找到 {}", resource),
                    field: None,
                },
            ),
            AppError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "STORAGE_ERROR".to_string(),
                    message_en: "A storage error occurred".to_string(),
                    message_zh: "数据文件读写失败".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_zh: "服务器内部错误".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_date_maps_to_duplicate_entry() {
        let house = HouseNumber::new(3).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let err = AppError::from(RecordError::DuplicateDate { house, date });
        assert!(matches!(err, AppError::DuplicateEntry { .. }));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_record_error_maps_to_validation() {
        let err = AppError::from(RecordError::NegativeFeed);
        match &err {
            AppError::Validation { field, .. } => assert_eq!(field, "feed_kg"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let err = AppError::record_not_found("weights", 9);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
