//! CSV-backed sheet store: one file per sheet

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use shared::{DailyRecord, HouseNumber, PurchaseRecord, SheetName, WeightSample};

use super::{SheetStore, StoreError, StoreResult};

/// Stores each sheet as `<data_dir>/<sheet>.csv`
#[derive(Debug, Clone)]
pub struct CsvSheetStore {
    data_dir: PathBuf,
}

impl CsvSheetStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        tracing::debug!("Sheet store opened at {}", data_dir.display());
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn sheet_path(&self, sheet: SheetName) -> PathBuf {
        self.data_dir.join(format!("{}.csv", sheet))
    }

    fn read_rows<T: DeserializeOwned>(&self, sheet: SheetName) -> StoreResult<Vec<T>> {
        let path = self.sheet_path(sheet);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let csv_error = |source| StoreError::Csv { sheet, source };
        let mut reader = csv::Reader::from_path(&path).map_err(csv_error)?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(csv_error)?;

        tracing::debug!("Loaded {} rows from sheet {}", rows.len(), sheet);
        Ok(rows)
    }

    /// Replace the sheet file. Rows go to a temporary file first so a failed
    /// write leaves the previous sheet intact.
    fn write_rows<T: Serialize>(&self, sheet: SheetName, rows: &[T]) -> StoreResult<()> {
        let path = self.sheet_path(sheet);
        let tmp_path = path.with_extension("csv.tmp");

        let csv_error = |source| StoreError::Csv { sheet, source };
        let mut writer = csv::Writer::from_path(&tmp_path).map_err(csv_error)?;
        for row in rows {
            writer.serialize(row).map_err(csv_error)?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, &path)?;
        tracing::debug!("Saved {} rows to sheet {}", rows.len(), sheet);
        Ok(())
    }
}

impl SheetStore for CsvSheetStore {
    fn load_house(&self, house: HouseNumber) -> StoreResult<Vec<DailyRecord>> {
        self.read_rows(SheetName::House(house))
    }

    fn save_house(&self, house: HouseNumber, records: &[DailyRecord]) -> StoreResult<()> {
        self.write_rows(SheetName::House(house), records)
    }

    fn load_weight_samples(&self) -> StoreResult<Vec<WeightSample>> {
        self.read_rows(SheetName::WeightSamples)
    }

    fn save_weight_samples(&self, samples: &[WeightSample]) -> StoreResult<()> {
        self.write_rows(SheetName::WeightSamples, samples)
    }

    fn load_purchases(&self) -> StoreResult<Vec<PurchaseRecord>> {
        self.read_rows(SheetName::Purchases)
    }

    fn save_purchases(&self, purchases: &[PurchaseRecord]) -> StoreResult<()> {
        self.write_rows(SheetName::Purchases, purchases)
    }
}
