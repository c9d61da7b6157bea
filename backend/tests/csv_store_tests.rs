//! CSV sheet store tests
//!
//! - One file per sheet, read back exactly as written
//! - Missing sheets read as empty
//! - Spreadsheet date layouts normalized to calendar dates on load

use std::fs;

use chrono::NaiveDate;
use poultry_backend::store::{CsvSheetStore, SheetRows, SheetStore};
use rust_decimal::Decimal;
use shared::{
    recalculate_stock, DailyRecord, FeedType, HouseNumber, Layer, PurchaseRecord, SheetName,
    WeightSample,
};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn house(number: u8) -> HouseNumber {
    HouseNumber::new(number).unwrap()
}

#[test]
fn test_house_sheet_round_trip() {
    let dir = tempdir().unwrap();
    let store = CsvSheetStore::open(dir.path()).unwrap();

    let mut records = vec![
        DailyRecord::new(date(2024, 2, 1), house(3), 20, Decimal::new(1205, 1), 2, 1),
        DailyRecord::new(date(2024, 2, 2), house(3), 21, Decimal::new(1198, 1), 0, 3),
    ];
    recalculate_stock(&mut records, 20_000);
    store.save_house(house(3), &records).unwrap();

    assert!(dir.path().join("3.csv").exists());
    assert!(!dir.path().join("3.csv.tmp").exists());
    assert_eq!(store.load_house(house(3)).unwrap(), records);
}

#[test]
fn test_missing_sheets_are_empty() {
    let dir = tempdir().unwrap();
    let store = CsvSheetStore::open(dir.path().join("fresh")).unwrap();

    assert!(store.load_house(house(16)).unwrap().is_empty());
    assert!(store.load_weight_samples().unwrap().is_empty());
    assert!(store.load_purchases().unwrap().is_empty());
}

#[test]
fn test_dates_normalized_on_load() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("5.csv"),
        "date,house,age,feed_kg,deaths,culls,stock\n\
         2024-02-01 00:00:00,5,30,118.5,1,0,999\n\
         2024-02-02T06:15:00,5,31,119,0,2,997\n\
         2024/02/03,5,32,120,1,1,995\n",
    )
    .unwrap();
    let store = CsvSheetStore::open(dir.path()).unwrap();

    let records = store.load_house(house(5)).unwrap();
    let dates: Vec<_> = records.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 2, 1), date(2024, 2, 2), date(2024, 2, 3)]
    );
    assert_eq!(records[0].feed_kg, Decimal::new(1185, 1));

    // Saving writes the plain calendar form back
    store.save_house(house(5), &records).unwrap();
    let raw = fs::read_to_string(dir.path().join("5.csv")).unwrap();
    assert!(raw.contains("\n2024-02-01,5,30,"));
    assert!(!raw.contains("00:00:00"));
}

#[test]
fn test_weight_and_purchase_sheets() {
    let dir = tempdir().unwrap();
    let store = CsvSheetStore::open(dir.path()).unwrap();

    let samples = vec![WeightSample::new(
        date(2024, 3, 4),
        house(8),
        42,
        Layer::Third,
        12,
        Decimal::new(2250, 2),
        35,
    )];
    let purchases = vec![PurchaseRecord {
        date: date(2024, 3, 4),
        house: house(8),
        amount_kg: 3_000,
        feed_type: FeedType::F510Dc,
    }];
    store.save_weight_samples(&samples).unwrap();
    store.save_purchases(&purchases).unwrap();

    assert_eq!(store.load_weight_samples().unwrap(), samples);
    assert_eq!(store.load_purchases().unwrap(), purchases);
    let raw = fs::read_to_string(dir.path().join("purchases.csv")).unwrap();
    assert!(raw.contains("510DC"));
}

#[test]
fn test_malformed_row_names_the_sheet() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("purchases.csv"),
        "date,house,amount_kg,feed_type\nnot a date,1,100,510\n",
    )
    .unwrap();
    let store = CsvSheetStore::open(dir.path()).unwrap();

    let err = store.load_purchases().unwrap_err();
    assert!(err.to_string().contains("purchases"));
}

#[test]
fn test_load_all_covers_every_sheet() {
    let dir = tempdir().unwrap();
    let store = CsvSheetStore::open(dir.path()).unwrap();
    let mut records = vec![DailyRecord::new(
        date(2024, 1, 1),
        house(1),
        1,
        Decimal::ZERO,
        0,
        0,
    )];
    recalculate_stock(&mut records, 100);
    store.save_house(house(1), &records).unwrap();

    let workbook = store.load_all().unwrap();
    assert_eq!(workbook.sheets.len(), 18);
    assert!(matches!(
        workbook.sheets.get(&SheetName::House(house(1))),
        Some(SheetRows::Daily(rows)) if rows.len() == 1
    ));
    assert!(workbook.sheets[&SheetName::Purchases].is_empty());
}
