//! Running head-count ("stock on hand") recalculation

use crate::models::DailyRecord;
use crate::warning::InconsistencyWarning;

/// Head count placed in a house that has no records yet
pub const DEFAULT_INITIAL_STOCK: i64 = 54_000;

/// Rewrite the stock of every record from `initial_stock`.
///
/// `records` must already be in chronological order; they are not
/// re-sorted. Each record's stock is the previous stock minus that day's
/// deaths and culls. Stock is never clamped, so bad counts show up as a
/// negative head count instead of being hidden.
pub fn recalculate_stock(records: &mut [DailyRecord], initial_stock: i64) {
    let mut stock = initial_stock;
    for record in records.iter_mut() {
        stock -= record.losses();
        record.stock = stock;
    }
}

/// Head count the house started with, inferred from its earliest record.
///
/// Falls back to `default_stock` for a house without records.
pub fn infer_initial_stock(records: &[DailyRecord], default_stock: i64) -> i64 {
    records
        .iter()
        .min_by_key(|r| r.date)
        .map(|first| first.stock + first.losses())
        .unwrap_or(default_stock)
}

/// Order a house's records by date. Records sharing a date keep their order.
pub fn sort_chronologically(records: &mut [DailyRecord]) {
    records.sort_by_key(|r| r.date);
}

/// Sort then recalculate, the full pass every mutation of a house ends with
pub fn rebuild_house(records: &mut [DailyRecord], initial_stock: i64) {
    sort_chronologically(records);
    recalculate_stock(records, initial_stock);
}

/// One warning per record whose stock went below zero
pub fn negative_stock_warnings(records: &[DailyRecord]) -> Vec<InconsistencyWarning> {
    records
        .iter()
        .filter(|r| r.stock < 0)
        .map(|r| InconsistencyWarning::NegativeStock {
            date: r.date,
            stock: r.stock,
        })
        .collect()
}
