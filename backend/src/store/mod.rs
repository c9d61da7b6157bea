//! Sheet storage
//!
//! Records live in tabular sheets: one per house for daily records, plus a
//! weight sample sheet and a purchase sheet shared by all houses. A sheet is
//! always read and written whole; each house is its own unit of persistence.

mod csv_store;
mod memory;

use std::collections::BTreeMap;

use serde::Serialize;
use shared::{DailyRecord, HouseNumber, PurchaseRecord, SheetName, WeightSample};
use thiserror::Error;

pub use csv_store::CsvSheetStore;
pub use memory::MemorySheetStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sheet {sheet} could not be read or written: {source}")]
    Csv {
        sheet: SheetName,
        #[source]
        source: csv::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository over the workbook's sheets
pub trait SheetStore: Send + Sync {
    /// Daily records of one house, in stored order
    fn load_house(&self, house: HouseNumber) -> StoreResult<Vec<DailyRecord>>;

    fn save_house(&self, house: HouseNumber, records: &[DailyRecord]) -> StoreResult<()>;

    fn load_weight_samples(&self) -> StoreResult<Vec<WeightSample>>;

    fn save_weight_samples(&self, samples: &[WeightSample]) -> StoreResult<()>;

    fn load_purchases(&self) -> StoreResult<Vec<PurchaseRecord>>;

    fn save_purchases(&self, purchases: &[PurchaseRecord]) -> StoreResult<()>;

    fn load_sheet(&self, sheet: SheetName) -> StoreResult<SheetRows> {
        Ok(match sheet {
            SheetName::House(house) => SheetRows::Daily(self.load_house(house)?),
            SheetName::WeightSamples => SheetRows::WeightSamples(self.load_weight_samples()?),
            SheetName::Purchases => SheetRows::Purchases(self.load_purchases()?),
        })
    }

    /// Every sheet at once, keyed by sheet name
    fn load_all(&self) -> StoreResult<Workbook> {
        let mut sheets = BTreeMap::new();
        for sheet in SheetName::all() {
            sheets.insert(sheet, self.load_sheet(sheet)?);
        }
        Ok(Workbook { sheets })
    }
}

/// Rows of a single sheet
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum SheetRows {
    Daily(Vec<DailyRecord>),
    WeightSamples(Vec<WeightSample>),
    Purchases(Vec<PurchaseRecord>),
}

impl SheetRows {
    pub fn len(&self) -> usize {
        match self {
            SheetRows::Daily(rows) => rows.len(),
            SheetRows::WeightSamples(rows) => rows.len(),
            SheetRows::Purchases(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dated one-line summary of every row, in sheet order
    pub fn descriptions(&self) -> Vec<String> {
        match self {
            SheetRows::Daily(rows) => rows
                .iter()
                .map(|r| format!("{}: {}", r.date, r.describe()))
                .collect(),
            SheetRows::WeightSamples(rows) => rows
                .iter()
                .map(|r| format!("{}: {}", r.date, r.describe()))
                .collect(),
            SheetRows::Purchases(rows) => rows
                .iter()
                .map(|r| format!("{}: {}", r.date, r.describe()))
                .collect(),
        }
    }
}

/// The whole workbook as loaded from a store
#[derive(Debug, Clone, Serialize)]
pub struct Workbook {
    pub sheets: BTreeMap<SheetName, SheetRows>,
}

impl Workbook {
    /// Row count per sheet
    pub fn row_counts(&self) -> BTreeMap<SheetName, usize> {
        self.sheets
            .iter()
            .map(|(name, rows)| (*name, rows.len()))
            .collect()
    }
}
