//! Feed purchase service

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::{FeedType, HouseNumber, PurchaseRecord, SheetName};
use validator::Validate;

use super::{validate_input, MutationOutcome};
use crate::error::{AppError, AppResult};
use crate::store::SheetStore;

/// Purchase service for the shared purchase sheet
#[derive(Clone)]
pub struct PurchaseService {
    store: Arc<dyn SheetStore>,
}

/// Input for recording a feed delivery
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPurchaseInput {
    pub date: NaiveDate,
    #[validate(range(min = 1, max = 16, message = "House number must be between 1 and 16"))]
    pub house: u8,
    #[validate(range(max = 50000, message = "Purchase amount cannot exceed 50000kg"))]
    pub amount_kg: u32,
    pub feed_type: FeedType,
}

/// Field-level changes to a stored purchase
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePurchaseInput {
    #[validate(range(max = 50000, message = "Purchase amount cannot exceed 50000kg"))]
    pub amount_kg: Option<u32>,
    pub feed_type: Option<FeedType>,
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// Stored purchases in insertion order, optionally limited to one house
    pub fn purchases(&self, house: Option<HouseNumber>) -> AppResult<Vec<PurchaseRecord>> {
        let purchases = self.store.load_purchases()?;
        Ok(match house {
            Some(house) => purchases.into_iter().filter(|p| p.house == house).collect(),
            None => purchases,
        })
    }

    /// Append a purchase. The sheet keeps insertion order.
    pub fn record(&self, input: RecordPurchaseInput) -> AppResult<MutationOutcome<PurchaseRecord>> {
        validate_input(&input)?;

        let record = PurchaseRecord {
            date: input.date,
            house: HouseNumber::new(input.house)?,
            amount_kg: input.amount_kg,
            feed_type: input.feed_type,
        };

        let mut purchases = self.store.load_purchases()?;
        purchases.push(record.clone());
        self.store.save_purchases(&purchases)?;
        tracing::info!(
            "House {} purchased {}kg of {} on {}",
            record.house,
            record.amount_kg,
            record.feed_type,
            record.date
        );

        Ok(MutationOutcome::new(record, Vec::new()))
    }

    pub fn update(
        &self,
        index: usize,
        changes: UpdatePurchaseInput,
    ) -> AppResult<MutationOutcome<PurchaseRecord>> {
        validate_input(&changes)?;

        let mut purchases = self.store.load_purchases()?;
        let purchase = purchases
            .get_mut(index)
            .ok_or_else(|| AppError::record_not_found(SheetName::Purchases, index))?;

        if let Some(amount_kg) = changes.amount_kg {
            purchase.amount_kg = amount_kg;
        }
        if let Some(feed_type) = changes.feed_type {
            purchase.feed_type = feed_type;
        }

        let updated = purchase.clone();
        self.store.save_purchases(&purchases)?;
        tracing::info!("Updated purchase {}", index);

        Ok(MutationOutcome::new(updated, Vec::new()))
    }

    pub fn delete(&self, index: usize) -> AppResult<MutationOutcome<PurchaseRecord>> {
        let mut purchases = self.store.load_purchases()?;
        if index >= purchases.len() {
            return Err(AppError::record_not_found(SheetName::Purchases, index));
        }

        let removed = purchases.remove(index);
        self.store.save_purchases(&purchases)?;
        tracing::info!("Deleted purchase {} from {}", index, removed.date);

        Ok(MutationOutcome::new(removed, Vec::new()))
    }
}
