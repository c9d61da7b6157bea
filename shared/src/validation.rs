//! Validation rules for poultry house records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::HouseNumber;

/// Most feed a house can eat in one day
pub const MAX_DAILY_FEED_KG: u32 = 20_000;

/// Most birds weighed from one cage layer
pub const MAX_SAMPLE_COUNT: u32 = 100;

/// Heaviest total weight of one layer sample
pub const MAX_SAMPLE_WEIGHT_KG: u32 = 50;

/// A record that breaks one of the domain rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("House number {0} is out of range 1-16")]
    HouseOutOfRange(i64),

    #[error("Feed amount cannot be negative")]
    NegativeFeed,

    #[error("Feed amount cannot exceed 20000kg")]
    ExcessiveFeed,

    #[error("Sample count must be at least 1")]
    EmptySample,

    #[error("Sample count cannot exceed 100")]
    OversizedSample,

    #[error("Total weight cannot be negative")]
    NegativeWeight,

    #[error("Total weight cannot exceed 50kg")]
    ExcessiveWeight,

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Unknown feed type: {0}")]
    UnknownFeedType(String),

    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    #[error("House {house} already has a record on {date}")]
    DuplicateDate { house: HouseNumber, date: NaiveDate },
}

impl RecordError {
    /// Name of the input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            RecordError::HouseOutOfRange(_) => "house",
            RecordError::NegativeFeed | RecordError::ExcessiveFeed => "feed_kg",
            RecordError::EmptySample | RecordError::OversizedSample => "sample_count",
            RecordError::NegativeWeight | RecordError::ExcessiveWeight => "total_weight_kg",
            RecordError::UnknownLayer(_) => "layer",
            RecordError::UnknownFeedType(_) => "feed_type",
            RecordError::UnknownSheet(_) => "sheet",
            RecordError::DuplicateDate { .. } => "date",
        }
    }
}

pub fn validate_feed_kg(feed_kg: Decimal) -> Result<(), RecordError> {
    if feed_kg < Decimal::ZERO {
        return Err(RecordError::NegativeFeed);
    }
    if feed_kg > Decimal::from(MAX_DAILY_FEED_KG) {
        return Err(RecordError::ExcessiveFeed);
    }
    Ok(())
}

/// Validate one layer's weighing sample
pub fn validate_sample(sample_count: u32, total_weight_kg: Decimal) -> Result<(), RecordError> {
    if sample_count < 1 {
        return Err(RecordError::EmptySample);
    }
    if sample_count > MAX_SAMPLE_COUNT {
        return Err(RecordError::OversizedSample);
    }
    if total_weight_kg < Decimal::ZERO {
        return Err(RecordError::NegativeWeight);
    }
    if total_weight_kg > Decimal::from(MAX_SAMPLE_WEIGHT_KG) {
        return Err(RecordError::ExcessiveWeight);
    }
    Ok(())
}
