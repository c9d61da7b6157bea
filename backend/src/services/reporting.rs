//! Reporting service for recent activity and sheet exports

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{DailyRecord, DateRange, HouseNumber, PurchaseRecord, SheetName};

use crate::error::{AppError, AppResult};
use crate::store::{SheetRows, SheetStore};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn SheetStore>,
}

/// Figures shown under the recent daily data table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailySummary {
    /// Mean feed per recorded day in the window, to one decimal place
    pub average_feed_kg: Option<Decimal>,
    pub total_deaths: u64,
    pub total_culls: u64,
    /// Stock of the house's latest record, inside the window or not
    pub current_stock: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentDaily {
    pub house: HouseNumber,
    pub range: DateRange,
    /// Newest first
    pub records: Vec<DailyRecord>,
    pub summary: DailySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentPurchases {
    pub house: HouseNumber,
    pub range: DateRange,
    /// Newest first
    pub purchases: Vec<PurchaseRecord>,
    pub total_kg: u64,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// Days of a house dated within the last `days` days up to `today`
    pub fn recent_daily(
        &self,
        house: HouseNumber,
        days: u32,
        today: NaiveDate,
    ) -> AppResult<RecentDaily> {
        let all = self.store.load_house(house)?;
        let range = DateRange::trailing(today, days);

        let mut records: Vec<DailyRecord> = all
            .iter()
            .filter(|r| r.date >= range.start)
            .cloned()
            .collect();
        records.sort_by_key(|r| Reverse(r.date));

        let summary = DailySummary {
            average_feed_kg: average_feed(&records),
            total_deaths: records.iter().map(|r| u64::from(r.deaths)).sum(),
            total_culls: records.iter().map(|r| u64::from(r.culls)).sum(),
            current_stock: all.iter().max_by_key(|r| r.date).map(|r| r.stock),
        };

        Ok(RecentDaily {
            house,
            range,
            records,
            summary,
        })
    }

    /// Purchases of a house dated within the last `days` days up to `today`
    pub fn recent_purchases(
        &self,
        house: HouseNumber,
        days: u32,
        today: NaiveDate,
    ) -> AppResult<RecentPurchases> {
        let range = DateRange::trailing(today, days);
        let mut purchases: Vec<PurchaseRecord> = self
            .store
            .load_purchases()?
            .into_iter()
            .filter(|p| p.house == house && p.date >= range.start)
            .collect();
        purchases.sort_by_key(|p| Reverse(p.date));

        let total_kg = purchases.iter().map(|p| u64::from(p.amount_kg)).sum();
        Ok(RecentPurchases {
            house,
            range,
            purchases,
            total_kg,
        })
    }

    /// Row count of every sheet in the workbook
    pub fn overview(&self) -> AppResult<BTreeMap<SheetName, usize>> {
        Ok(self.store.load_all()?.row_counts())
    }

    /// Export a sheet as CSV text
    pub fn export_sheet(&self, sheet: SheetName) -> AppResult<String> {
        match self.store.load_sheet(sheet)? {
            SheetRows::Daily(rows) => Self::export_to_csv(&rows),
            SheetRows::WeightSamples(rows) => Self::export_to_csv(&rows),
            SheetRows::Purchases(rows) => Self::export_to_csv(&rows),
        }
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

fn average_feed(records: &[DailyRecord]) -> Option<Decimal> {
    if records.is_empty() {
        return None;
    }
    // Imported sheets skip the form bounds, so the total may not fit
    let Some(total) = records
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.feed_kg))
    else {
        tracing::warn!("Feed total over {} days overflows, average omitted", records.len());
        return None;
    };
    Some((total / Decimal::from(records.len())).round_dp(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySheetStore;
    use shared::{recalculate_stock, FeedType};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn house() -> HouseNumber {
        HouseNumber::new(5).unwrap()
    }

    fn seeded_store() -> Arc<MemorySheetStore> {
        let mut records: Vec<DailyRecord> = (1..=20)
            .map(|day| DailyRecord::new(d(day), house(), day + 20, Decimal::from(100 + day), 2, 1))
            .collect();
        recalculate_stock(&mut records, 10_000);
        Arc::new(MemorySheetStore::new().with_house(house(), records))
    }

    #[test]
    fn test_recent_daily_window() {
        let service = ReportingService::new(seeded_store());
        let recent = service.recent_daily(house(), 7, d(20)).unwrap();

        assert_eq!(recent.range.start, d(14));
        assert_eq!(recent.records.len(), 7);
        assert_eq!(recent.records[0].date, d(20));
        assert_eq!(recent.records[6].date, d(14));
        assert_eq!(recent.summary.total_deaths, 14);
        assert_eq!(recent.summary.total_culls, 7);
        // Feed 114..=120 averages 117
        assert_eq!(recent.summary.average_feed_kg, Some(Decimal::from(117)));
        assert_eq!(recent.summary.current_stock, Some(10_000 - 60));
    }

    #[test]
    fn test_recent_daily_unbounded_window() {
        let service = ReportingService::new(seeded_store());
        let recent = service.recent_daily(house(), u32::MAX, d(20)).unwrap();
        assert_eq!(recent.range.start, NaiveDate::MIN);
        assert_eq!(recent.records.len(), 20);
    }

    #[test]
    fn test_average_feed_overflow_is_omitted() {
        let records = vec![
            DailyRecord::new(d(1), house(), 1, Decimal::MAX, 0, 0),
            DailyRecord::new(d(2), house(), 2, Decimal::MAX, 0, 0),
        ];
        let store = Arc::new(MemorySheetStore::new().with_house(house(), records));
        let recent = ReportingService::new(store).recent_daily(house(), 30, d(20)).unwrap();
        assert_eq!(recent.records.len(), 2);
        assert_eq!(recent.summary.average_feed_kg, None);
    }

    #[test]
    fn test_recent_daily_empty_house() {
        let service = ReportingService::new(Arc::new(MemorySheetStore::new()));
        let recent = service.recent_daily(house(), 14, d(20)).unwrap();
        assert!(recent.records.is_empty());
        assert_eq!(recent.summary.average_feed_kg, None);
        assert_eq!(recent.summary.current_stock, None);
    }

    #[test]
    fn test_recent_purchases_filters_house_and_window() {
        let store = Arc::new(MemorySheetStore::new());
        let other = HouseNumber::new(6).unwrap();
        let purchases = vec![
            PurchaseRecord { date: d(1), house: house(), amount_kg: 500, feed_type: FeedType::F510 },
            PurchaseRecord { date: d(18), house: house(), amount_kg: 700, feed_type: FeedType::F511 },
            PurchaseRecord { date: d(19), house: other, amount_kg: 900, feed_type: FeedType::F513 },
            PurchaseRecord { date: d(20), house: house(), amount_kg: 300, feed_type: FeedType::F510Dc },
        ];
        store.save_purchases(&purchases).unwrap();

        let service = ReportingService::new(store);
        let recent = service.recent_purchases(house(), 14, d(20)).unwrap();
        assert_eq!(recent.purchases.len(), 2);
        assert_eq!(recent.purchases[0].date, d(20));
        assert_eq!(recent.total_kg, 1000);
    }

    #[test]
    fn test_export_sheet_has_header() {
        let service = ReportingService::new(seeded_store());
        let csv = service.export_sheet(SheetName::House(house())).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("date,house,age,feed_kg,deaths,culls,stock")
        );
        assert_eq!(lines.next(), Some("2024-03-01,5,21,101,2,1,9997"));
        assert_eq!(csv.lines().count(), 21);
    }

    #[test]
    fn test_overview_counts_every_sheet() {
        let service = ReportingService::new(seeded_store());
        let counts = service.overview().unwrap();
        assert_eq!(counts.len(), 18);
        assert_eq!(counts[&SheetName::House(house())], 20);
        assert_eq!(counts[&SheetName::Purchases], 0);
    }
}
