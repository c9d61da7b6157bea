//! In-memory sheet store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use shared::{DailyRecord, HouseNumber, PurchaseRecord, WeightSample};

use super::{SheetStore, StoreResult};

#[derive(Debug, Default)]
struct Sheets {
    houses: HashMap<HouseNumber, Vec<DailyRecord>>,
    weight_samples: Vec<WeightSample>,
    purchases: Vec<PurchaseRecord>,
}

/// Keeps every sheet in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySheetStore {
    sheets: Mutex<Sheets>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a house's sheet with rows exactly as given
    pub fn with_house(self, house: HouseNumber, records: Vec<DailyRecord>) -> Self {
        self.lock().houses.insert(house, records);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Sheets> {
        // Sheets are replaced whole, so a poisoned lock still holds consistent data
        self.sheets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SheetStore for MemorySheetStore {
    fn load_house(&self, house: HouseNumber) -> StoreResult<Vec<DailyRecord>> {
        Ok(self.lock().houses.get(&house).cloned().unwrap_or_default())
    }

    fn save_house(&self, house: HouseNumber, records: &[DailyRecord]) -> StoreResult<()> {
        self.lock().houses.insert(house, records.to_vec());
        Ok(())
    }

    fn load_weight_samples(&self) -> StoreResult<Vec<WeightSample>> {
        Ok(self.lock().weight_samples.clone())
    }

    fn save_weight_samples(&self, samples: &[WeightSample]) -> StoreResult<()> {
        self.lock().weight_samples = samples.to_vec();
        Ok(())
    }

    fn load_purchases(&self) -> StoreResult<Vec<PurchaseRecord>> {
        Ok(self.lock().purchases.clone())
    }

    fn save_purchases(&self, purchases: &[PurchaseRecord]) -> StoreResult<()> {
        self.lock().purchases = purchases.to_vec();
        Ok(())
    }
}
