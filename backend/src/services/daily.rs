//! Daily record service: age stamping, duplicate guarding and stock upkeep

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    ensure_unique_date, has_duplicate, infer_initial_stock, negative_stock_warnings,
    rebuild_house, recalculate_stock, resolve_age_with_basis, validate_feed_kg, AgeAnchor,
    AgeResolution, DailyRecord, HouseNumber, InconsistencyWarning,
};
use validator::Validate;

use super::{validate_input, MutationOutcome};
use crate::error::{AppError, AppResult};
use crate::store::SheetStore;

/// Daily record service for one house's sheet at a time
#[derive(Clone)]
pub struct DailyRecordService {
    store: Arc<dyn SheetStore>,
    default_initial_stock: i64,
}

/// Input for recording a day
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordDailyInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub feed_kg: Decimal,
    #[serde(default)]
    #[validate(range(max = 1000, message = "Deaths cannot exceed 1000 a day"))]
    pub deaths: u32,
    #[serde(default)]
    #[validate(range(max = 1000, message = "Culls cannot exceed 1000 a day"))]
    pub culls: u32,
}

/// Field-level changes to an existing day
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDailyInput {
    pub date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Age must be at least 1"))]
    pub age: Option<u32>,
    pub feed_kg: Option<Decimal>,
    #[validate(range(max = 1000, message = "Deaths cannot exceed 1000 a day"))]
    pub deaths: Option<u32>,
    #[validate(range(max = 1000, message = "Culls cannot exceed 1000 a day"))]
    pub culls: Option<u32>,
}

/// A stored day together with where it landed on the sheet
#[derive(Debug, Clone, Serialize)]
pub struct DailyEntry {
    #[serde(flatten)]
    pub record: DailyRecord,
    /// Position on the date-sorted sheet
    pub index: usize,
    /// Head count the stock column was rebuilt from
    pub initial_stock: i64,
}

/// What the entry form shows before submitting
#[derive(Debug, Clone, Serialize)]
pub struct DailyPreview {
    pub house: HouseNumber,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub resolution: AgeResolution,
    /// Rows already holding this date
    pub duplicates: Vec<DailyRecord>,
    pub warnings: Vec<InconsistencyWarning>,
}

impl DailyRecordService {
    /// Create a new DailyRecordService instance
    pub fn new(store: Arc<dyn SheetStore>, default_initial_stock: i64) -> Self {
        Self {
            store,
            default_initial_stock,
        }
    }

    /// All days of a house, in sheet order
    pub fn records(&self, house: HouseNumber) -> AppResult<Vec<DailyRecord>> {
        Ok(self.store.load_house(house)?)
    }

    /// Age history of a house, used to stamp new rows on any sheet
    pub fn age_history(&self, house: HouseNumber) -> AppResult<Vec<AgeAnchor>> {
        Ok(anchors(&self.store.load_house(house)?))
    }

    /// Age and duplicate check for a date that has not been submitted yet
    pub fn preview(&self, house: HouseNumber, date: NaiveDate) -> AppResult<DailyPreview> {
        let records = self.store.load_house(house)?;
        let resolution = resolve_age_with_basis(&anchors(&records), date);
        let (duplicate, matches) = has_duplicate(&records, date);
        if duplicate {
            tracing::debug!("House {} already has {} row(s) on {}", house, matches.len(), date);
        }

        Ok(DailyPreview {
            house,
            date,
            resolution,
            duplicates: matches.into_iter().cloned().collect(),
            warnings: resolution.warning(date).into_iter().collect(),
        })
    }

    /// Record a new day for a house
    pub fn record(
        &self,
        house: HouseNumber,
        input: RecordDailyInput,
    ) -> AppResult<MutationOutcome<DailyEntry>> {
        validate_input(&input)?;
        validate_feed_kg(input.feed_kg)?;

        let mut records = self.store.load_house(house)?;
        // Authoritative check, the preview may be stale by now
        ensure_unique_date(house, &records, input.date)?;

        let resolution = resolve_age_with_basis(&anchors(&records), input.date);
        let initial_stock = infer_initial_stock(&records, self.default_initial_stock);

        records.push(DailyRecord::new(
            input.date,
            house,
            resolution.age,
            input.feed_kg,
            input.deaths,
            input.culls,
        ));
        let tracked = records.len() - 1;
        let index = rebuild_tracking(&mut records, tracked, initial_stock);
        self.store.save_house(house, &records)?;

        let record = records[index].clone();
        tracing::info!(
            "Recorded house {} on {}: age {}, stock {}",
            house,
            record.date,
            record.age,
            record.stock
        );

        let mut warnings: Vec<_> = resolution.warning(input.date).into_iter().collect();
        warnings.extend(negative_stock_warnings(&records));
        Ok(MutationOutcome::new(
            DailyEntry {
                record,
                index,
                initial_stock,
            },
            warnings,
        ))
    }

    /// Overwrite fields of the day at `index`, then rebuild the house
    pub fn update(
        &self,
        house: HouseNumber,
        index: usize,
        changes: UpdateDailyInput,
    ) -> AppResult<MutationOutcome<DailyEntry>> {
        validate_input(&changes)?;
        if let Some(feed_kg) = changes.feed_kg {
            validate_feed_kg(feed_kg)?;
        }

        let mut records = self.store.load_house(house)?;
        let mut updated = records
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::record_not_found(house, index))?;
        // Anchor on the sheet as persisted, before this edit touches it
        let initial_stock = infer_initial_stock(&records, self.default_initial_stock);
        let mut warnings = Vec::new();

        if let Some(date) = changes.date.filter(|d| *d != updated.date) {
            let others: Vec<DailyRecord> = records
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, r)| r.clone())
                .collect();
            ensure_unique_date(house, &others, date)?;

            if changes.age.is_none() {
                let resolution = resolve_age_with_basis(&anchors(&others), date);
                updated.age = resolution.age;
                warnings.extend(resolution.warning(date));
            }
            updated.date = date;
        }
        if let Some(age) = changes.age {
            updated.age = age;
        }
        if let Some(feed_kg) = changes.feed_kg {
            updated.feed_kg = feed_kg;
        }
        if let Some(deaths) = changes.deaths {
            updated.deaths = deaths;
        }
        if let Some(culls) = changes.culls {
            updated.culls = culls;
        }

        records[index] = updated;
        let index = rebuild_tracking(&mut records, index, initial_stock);
        self.store.save_house(house, &records)?;
        tracing::info!("Updated house {} row {}; stock recalculated", house, index);

        warnings.extend(negative_stock_warnings(&records));
        Ok(MutationOutcome::new(
            DailyEntry {
                record: records[index].clone(),
                index,
                initial_stock,
            },
            warnings,
        ))
    }

    /// Remove the day at `index` and rebuild the remaining stock column
    pub fn delete(&self, house: HouseNumber, index: usize) -> AppResult<MutationOutcome<DailyRecord>> {
        let mut records = self.store.load_house(house)?;
        if index >= records.len() {
            return Err(AppError::record_not_found(house, index));
        }
        let initial_stock = infer_initial_stock(&records, self.default_initial_stock);

        let removed = records.remove(index);
        rebuild_house(&mut records, initial_stock);
        self.store.save_house(house, &records)?;
        tracing::info!("Deleted house {} record on {}", house, removed.date);

        Ok(MutationOutcome::new(removed, negative_stock_warnings(&records)))
    }
}

fn anchors(records: &[DailyRecord]) -> Vec<AgeAnchor> {
    records.iter().map(DailyRecord::anchor).collect()
}

/// Sort by date and recalculate every stock value from `initial_stock`.
/// Returns the new position of the row that was at `tracked`.
fn rebuild_tracking(records: &mut Vec<DailyRecord>, tracked: usize, initial_stock: i64) -> usize {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| records[i].date);
    let new_index = order.iter().position(|&i| i == tracked).unwrap_or(tracked);

    let mut slots: Vec<Option<DailyRecord>> = std::mem::take(records).into_iter().map(Some).collect();
    *records = order.into_iter().filter_map(|i| slots[i].take()).collect();

    recalculate_stock(records, initial_stock);
    new_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySheetStore;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn house() -> HouseNumber {
        HouseNumber::new(3).unwrap()
    }

    fn service() -> DailyRecordService {
        DailyRecordService::new(Arc::new(MemorySheetStore::new()), 1000)
    }

    fn day(date: NaiveDate, deaths: u32, culls: u32) -> RecordDailyInput {
        RecordDailyInput {
            date,
            feed_kg: Decimal::from(120),
            deaths,
            culls,
        }
    }

    #[test]
    fn test_rebuild_tracking_follows_row() {
        let h = house();
        let mut records = vec![
            DailyRecord::new(d(5), h, 5, Decimal::ZERO, 1, 0),
            DailyRecord::new(d(1), h, 1, Decimal::ZERO, 2, 0),
            DailyRecord::new(d(3), h, 3, Decimal::ZERO, 3, 0),
        ];
        let index = rebuild_tracking(&mut records, 0, 100);
        assert_eq!(index, 2);
        assert_eq!(records[index].date, d(5));
        let stocks: Vec<i64> = records.iter().map(|r| r.stock).collect();
        assert_eq!(stocks, vec![98, 95, 94]);
    }

    #[test]
    fn test_first_record_uses_default_stock_and_day_one() {
        let service = service();
        let outcome = service.record(house(), day(d(1), 5, 2)).unwrap();
        assert_eq!(outcome.record.record.age, 1);
        assert_eq!(outcome.record.record.stock, 993);
        assert_eq!(outcome.record.initial_stock, 1000);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_backfilled_day_is_sorted_and_aged() {
        let service = service();
        service.record(house(), day(d(10), 0, 0)).unwrap();
        let outcome = service.record(house(), day(d(8), 4, 0)).unwrap();

        assert_eq!(outcome.record.index, 0);
        assert_eq!(outcome.record.record.age, 1);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [InconsistencyWarning::DateBeforeHistory { age_clamped: true, .. }]
        ));

        let records = service.records(house()).unwrap();
        assert_eq!(records[0].date, d(8));
        assert_eq!(records[0].stock, 996);
        assert_eq!(records[1].stock, 996);
    }

    #[test]
    fn test_duplicate_rejected_and_sheet_unchanged() {
        let service = service();
        service.record(house(), day(d(1), 0, 0)).unwrap();
        let err = service.record(house(), day(d(1), 9, 9)).unwrap_err();
        assert!(matches!(err, AppError::DuplicateEntry { .. }));
        assert_eq!(service.records(house()).unwrap().len(), 1);
    }

    #[test]
    fn test_preview_reports_duplicates() {
        let service = service();
        service.record(house(), day(d(1), 0, 0)).unwrap();
        let preview = service.preview(house(), d(1)).unwrap();
        assert_eq!(preview.duplicates.len(), 1);
        assert_eq!(preview.resolution.age, 1);

        let preview = service.preview(house(), d(4)).unwrap();
        assert!(preview.duplicates.is_empty());
        assert_eq!(preview.resolution.age, 4);
    }

    #[test]
    fn test_update_out_of_range_is_not_found() {
        let service = service();
        let err = service
            .update(house(), 0, UpdateDailyInput::default())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_update_rejects_zero_age() {
        let service = service();
        service.record(house(), day(d(1), 0, 0)).unwrap();
        let changes = UpdateDailyInput {
            age: Some(0),
            ..Default::default()
        };
        let err = service.update(house(), 0, changes).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_record_rejects_implausible_day() {
        let service = service();
        let err = service.record(house(), day(d(1), 1001, 0)).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "deaths"));

        let mut huge_feed = day(d(1), 0, 0);
        huge_feed.feed_kg = Decimal::from_scientific("5e28").unwrap();
        let err = service.record(house(), huge_feed).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "feed_kg"));

        assert!(service.records(house()).unwrap().is_empty());
    }

    #[test]
    fn test_update_rejects_implausible_losses() {
        let service = service();
        service.record(house(), day(d(1), 0, 0)).unwrap();
        let changes = UpdateDailyInput {
            culls: Some(u32::MAX),
            ..Default::default()
        };
        let err = service.update(house(), 0, changes).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "culls"));
        assert_eq!(service.records(house()).unwrap()[0].stock, 1000);
    }
}
