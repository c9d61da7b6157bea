//! WebAssembly module for Poultry House Records
//!
//! Provides client-side computation for the entry forms:
//! - Age preview from a house's (date, age) history
//! - Stock column recalculation
//! - Mean sample weight
//! - Duplicate date check before submitting

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{
    has_duplicate, negative_stock_warnings, recalculate_stock, resolve_age_with_basis, sheet_date,
    AgeAnchor, InconsistencyWarning,
};

#[derive(Serialize)]
struct StockResult {
    records: Vec<DailyRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<InconsistencyWarning>,
}

fn parse_date(raw: &str) -> Result<chrono::NaiveDate, JsValue> {
    sheet_date::parse(raw).ok_or_else(|| JsValue::from_str(&format!("Invalid date: {}", raw)))
}

fn parse_history(history_json: &str) -> Result<Vec<AgeAnchor>, JsValue> {
    serde_json::from_str(history_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid history JSON: {}", e)))
}

/// Report an inconsistency in the browser console
fn warn(warning: &InconsistencyWarning) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&warning.to_string()));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = warning;
}

/// Age a record dated `date` would be stamped with, given the house's
/// `[{ "date": "YYYY-MM-DD", "age": n }]` history
#[wasm_bindgen]
pub fn resolve_age_json(history_json: &str, date: &str) -> Result<u32, JsValue> {
    let history = parse_history(history_json)?;
    let target = parse_date(date)?;

    let resolution = resolve_age_with_basis(&history, target);
    if let Some(warning) = resolution.warning(target) {
        warn(&warning);
    }
    Ok(resolution.age)
}

/// Rewrite the stock column of already ordered daily records
#[wasm_bindgen]
pub fn recalculate_stock_json(records_json: &str, initial_stock: i32) -> Result<String, JsValue> {
    let mut records: Vec<DailyRecord> = serde_json::from_str(records_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid records JSON: {}", e)))?;

    recalculate_stock(&mut records, i64::from(initial_stock));
    let warnings = negative_stock_warnings(&records);
    warnings.iter().for_each(warn);

    serde_json::to_string(&StockResult { records, warnings })
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Mean weight per bird in grams, to one decimal place
#[wasm_bindgen]
pub fn mean_weight_grams(total_weight_kg: f64, sample_count: u32) -> f64 {
    let total = Decimal::try_from(total_weight_kg).unwrap_or(Decimal::ZERO);
    shared::mean_weight_grams(total, sample_count)
        .to_string()
        .parse()
        .unwrap_or(0.0)
}

/// Whether the history already holds an entry on `date`
#[wasm_bindgen]
pub fn has_duplicate_json(history_json: &str, date: &str) -> Result<bool, JsValue> {
    let history = parse_history(history_json)?;
    let target = parse_date(date)?;
    let (duplicate, _) = has_duplicate(&history, target);
    Ok(duplicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &str = r#"[{"date":"2024-01-01","age":10}]"#;

    #[test]
    fn test_resolve_age() {
        assert_eq!(resolve_age_json(HISTORY, "2024-01-05").unwrap(), 14);
        assert_eq!(resolve_age_json(HISTORY, "2023-12-28").unwrap(), 6);
        assert_eq!(resolve_age_json(HISTORY, "2024-01-01").unwrap(), 10);
        assert_eq!(resolve_age_json("[]", "2024-01-01").unwrap(), 1);
    }

    #[test]
    fn test_recalculate_stock() {
        let records = r#"[
            {"date":"2024-01-01","house":1,"age":1,"feed_kg":"10","deaths":5,"culls":2},
            {"date":"2024-01-02","house":1,"age":2,"feed_kg":"10","deaths":3,"culls":0},
            {"date":"2024-01-03","house":1,"age":3,"feed_kg":"10","deaths":1,"culls":1}
        ]"#;
        let json = recalculate_stock_json(records, 1000).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let stocks: Vec<i64> = value["records"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["stock"].as_i64().unwrap())
            .collect();
        assert_eq!(stocks, vec![993, 990, 988]);
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn test_mean_weight() {
        assert!((mean_weight_grams(18.5, 10) - 1850.0).abs() < 0.001);
        assert!((mean_weight_grams(2.0, 3) - 666.7).abs() < 0.001);
        assert_eq!(mean_weight_grams(5.0, 0), 0.0);
    }

    #[test]
    fn test_has_duplicate() {
        assert!(has_duplicate_json(HISTORY, "2024-01-01").unwrap());
        assert!(!has_duplicate_json(HISTORY, "2024-01-02").unwrap());
    }
}
