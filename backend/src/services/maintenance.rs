//! Record maintenance across every sheet
//!
//! Rows are addressed by sheet name and their position on that sheet. Daily
//! edits go through [`DailyRecordService`] so the stock column is always
//! rebuilt; the weight and purchase sheets are edited in place.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    resolve_age_with_basis, validate_sample, DailyRecord, HouseNumber, InconsistencyWarning,
    Layer, PurchaseRecord, SheetName, WeightSample,
};
use validator::Validate;

use super::daily::{RecordDailyInput, UpdateDailyInput};
use super::purchase::{RecordPurchaseInput, UpdatePurchaseInput};
use super::weight::UpdateWeightInput;
use super::{
    validate_input, DailyRecordService, MutationOutcome, PurchaseService, WeightSampleService,
};
use crate::error::{AppError, AppResult};
use crate::store::{SheetRows, SheetStore};

/// Maintenance service dispatching on sheet name
#[derive(Clone)]
pub struct MaintenanceService {
    store: Arc<dyn SheetStore>,
    daily: DailyRecordService,
    weights: WeightSampleService,
    purchases: PurchaseService,
}

/// A single weight sample row entered by hand
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeightSampleInput {
    pub date: NaiveDate,
    #[validate(range(min = 1, max = 16, message = "House number must be between 1 and 16"))]
    pub house: u8,
    #[validate(range(min = 1, max = 100, message = "Cage number must be between 1 and 100"))]
    pub cage: u32,
    pub layer: Layer,
    pub sample_count: u32,
    pub total_weight_kg: Decimal,
    /// Resolved from the house's daily history when absent
    #[validate(range(min = 1, message = "Age must be at least 1"))]
    pub age: Option<u32>,
}

/// A row to insert, tagged with the kind of sheet it belongs on
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewRecord {
    Daily(RecordDailyInput),
    WeightSample(WeightSampleInput),
    Purchase(RecordPurchaseInput),
}

/// Field changes to a stored row, tagged like [`NewRecord`]
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordChanges {
    Daily(UpdateDailyInput),
    WeightSample(UpdateWeightInput),
    Purchase(UpdatePurchaseInput),
}

/// A row as stored on some sheet
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SheetRecord {
    Daily(DailyRecord),
    WeightSample(WeightSample),
    Purchase(PurchaseRecord),
}

/// Everything on one sheet, with a readable line per row
#[derive(Debug, Clone, Serialize)]
pub struct SheetListing {
    pub sheet: SheetName,
    pub rows: SheetRows,
    pub descriptions: Vec<String>,
}

impl MaintenanceService {
    pub fn new(store: Arc<dyn SheetStore>, default_initial_stock: i64) -> Self {
        Self {
            daily: DailyRecordService::new(store.clone(), default_initial_stock),
            weights: WeightSampleService::new(store.clone()),
            purchases: PurchaseService::new(store.clone()),
            store,
        }
    }

    /// Every row of a sheet in stored order
    pub fn list(&self, sheet: SheetName) -> AppResult<SheetListing> {
        let rows = self.store.load_sheet(sheet)?;
        Ok(SheetListing {
            sheet,
            descriptions: rows.descriptions(),
            rows,
        })
    }

    /// Insert a row on `sheet`
    pub fn insert(
        &self,
        sheet: SheetName,
        record: NewRecord,
    ) -> AppResult<MutationOutcome<SheetRecord>> {
        match (sheet, record) {
            (SheetName::House(house), NewRecord::Daily(input)) => Ok(self
                .daily
                .record(house, input)?
                .map(|entry| SheetRecord::Daily(entry.record))),
            (SheetName::WeightSamples, NewRecord::WeightSample(input)) => Ok(self
                .insert_weight_sample(input)?
                .map(SheetRecord::WeightSample)),
            (SheetName::Purchases, NewRecord::Purchase(input)) => {
                Ok(self.purchases.record(input)?.map(SheetRecord::Purchase))
            }
            (sheet, _) => Err(kind_mismatch(sheet)),
        }
    }

    /// Apply field changes to row `index` of `sheet`
    pub fn update(
        &self,
        sheet: SheetName,
        index: usize,
        changes: RecordChanges,
    ) -> AppResult<MutationOutcome<SheetRecord>> {
        match (sheet, changes) {
            (SheetName::House(house), RecordChanges::Daily(changes)) => Ok(self
                .daily
                .update(house, index, changes)?
                .map(|entry| SheetRecord::Daily(entry.record))),
            (SheetName::WeightSamples, RecordChanges::WeightSample(changes)) => Ok(self
                .weights
                .update(index, changes)?
                .map(SheetRecord::WeightSample)),
            (SheetName::Purchases, RecordChanges::Purchase(changes)) => Ok(self
                .purchases
                .update(index, changes)?
                .map(SheetRecord::Purchase)),
            (sheet, _) => Err(kind_mismatch(sheet)),
        }
    }

    /// Delete row `index` of `sheet`
    pub fn delete(&self, sheet: SheetName, index: usize) -> AppResult<MutationOutcome<SheetRecord>> {
        match sheet {
            SheetName::House(house) => {
                Ok(self.daily.delete(house, index)?.map(SheetRecord::Daily))
            }
            SheetName::WeightSamples => {
                Ok(self.weights.delete(index)?.map(SheetRecord::WeightSample))
            }
            SheetName::Purchases => Ok(self.purchases.delete(index)?.map(SheetRecord::Purchase)),
        }
    }

    fn insert_weight_sample(
        &self,
        input: WeightSampleInput,
    ) -> AppResult<MutationOutcome<WeightSample>> {
        validate_input(&input)?;
        validate_sample(input.sample_count, input.total_weight_kg)?;
        let house = HouseNumber::new(input.house)?;

        let mut warnings: Vec<InconsistencyWarning> = Vec::new();
        let age = match input.age {
            Some(age) => age,
            None => {
                let history = self.daily.age_history(house)?;
                let resolution = resolve_age_with_basis(&history, input.date);
                warnings.extend(resolution.warning(input.date));
                resolution.age
            }
        };

        let sample = WeightSample::new(
            input.date,
            house,
            input.cage,
            input.layer,
            input.sample_count,
            input.total_weight_kg,
            age,
        );
        let mut samples = self.store.load_weight_samples()?;
        samples.push(sample.clone());
        samples.sort_by_key(|s| s.date);
        self.store.save_weight_samples(&samples)?;
        tracing::info!("Inserted weight sample: {}", sample.describe());

        Ok(MutationOutcome::new(sample, warnings))
    }
}

fn kind_mismatch(sheet: SheetName) -> AppError {
    AppError::Validation {
        field: "kind".to_string(),
        message: format!("Record kind does not match sheet {}", sheet),
        message_zh: format!("记录类型与数据表 {} 不符", sheet),
    }
}
