//! Cage weighing service

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    mean_weight_grams, resolve_age_with_basis, validate_sample, AgeAnchor, DailyRecord,
    HouseNumber, Layer, SheetName, WeightSample,
};
use validator::Validate;

use super::{validate_input, MutationOutcome};
use crate::error::{AppError, AppResult};
use crate::store::SheetStore;

/// Weighing service for the shared weight sample sheet
#[derive(Clone)]
pub struct WeightSampleService {
    store: Arc<dyn SheetStore>,
}

/// One layer of a cage weighing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSampleInput {
    pub layer: Layer,
    /// Layers left at zero birds are skipped
    pub sample_count: u32,
    pub total_weight_kg: Decimal,
}

/// Input for weighing a cage
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordWeighingInput {
    pub date: NaiveDate,
    #[validate(range(min = 1, max = 16, message = "House number must be between 1 and 16"))]
    pub house: u8,
    #[validate(range(min = 1, max = 100, message = "Cage number must be between 1 and 100"))]
    pub cage: u32,
    #[validate(length(min = 1, max = 4, message = "Give between one and four layers"))]
    pub layers: Vec<LayerSampleInput>,
}

/// Field-level changes to a stored sample
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWeightInput {
    #[validate(range(min = 1, max = 100, message = "Cage number must be between 1 and 100"))]
    pub cage: Option<u32>,
    pub layer: Option<Layer>,
    #[validate(range(min = 1, max = 100, message = "Sample count must be between 1 and 100"))]
    pub sample_count: Option<u32>,
    pub total_weight_kg: Option<Decimal>,
    #[validate(range(min = 1, message = "Age must be at least 1"))]
    pub age: Option<u32>,
}

/// Totals over every layer of one weighing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeighingSummary {
    pub total_samples: u32,
    pub total_weight_kg: Decimal,
    pub mean_weight_g: Decimal,
}

impl WeighingSummary {
    pub fn of(samples: &[WeightSample]) -> Self {
        let total_samples: u32 = samples.iter().map(|s| s.sample_count).sum();
        let total_weight_kg: Decimal = samples.iter().map(|s| s.total_weight_kg).sum();
        Self {
            total_samples,
            total_weight_kg,
            mean_weight_g: mean_weight_grams(total_weight_kg, total_samples),
        }
    }
}

/// A stored cage weighing
#[derive(Debug, Clone, Serialize)]
pub struct CageWeighing {
    pub age: u32,
    pub samples: Vec<WeightSample>,
    pub summary: WeighingSummary,
}

impl WeightSampleService {
    /// Create a new WeightSampleService instance
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// Stored samples, optionally limited to one house
    pub fn samples(&self, house: Option<HouseNumber>) -> AppResult<Vec<WeightSample>> {
        let samples = self.store.load_weight_samples()?;
        Ok(match house {
            Some(house) => samples.into_iter().filter(|s| s.house == house).collect(),
            None => samples,
        })
    }

    /// Record every sampled layer of a cage, stamped with the house's age
    pub fn record_weighing(
        &self,
        input: RecordWeighingInput,
    ) -> AppResult<MutationOutcome<CageWeighing>> {
        validate_input(&input)?;
        let house = HouseNumber::new(input.house)?;

        let mut seen = HashSet::new();
        if let Some(repeated) = input.layers.iter().find(|l| !seen.insert(l.layer)) {
            return Err(AppError::Validation {
                field: "layers".to_string(),
                message: format!("{} was given more than once", repeated.layer),
                message_zh: format!("{}层重复录入", repeated.layer.number()),
            });
        }

        let sampled: Vec<&LayerSampleInput> =
            input.layers.iter().filter(|l| l.sample_count > 0).collect();
        if sampled.is_empty() {
            return Err(AppError::Validation {
                field: "layers".to_string(),
                message: "At least one layer needs a sample".to_string(),
                message_zh: "请至少输入一层的样本数据".to_string(),
            });
        }
        for layer in &sampled {
            validate_sample(layer.sample_count, layer.total_weight_kg)?;
        }

        let history: Vec<AgeAnchor> = self
            .store
            .load_house(house)?
            .iter()
            .map(DailyRecord::anchor)
            .collect();
        let resolution = resolve_age_with_basis(&history, input.date);

        let new_samples: Vec<WeightSample> = sampled
            .iter()
            .map(|l| {
                WeightSample::new(
                    input.date,
                    house,
                    input.cage,
                    l.layer,
                    l.sample_count,
                    l.total_weight_kg,
                    resolution.age,
                )
            })
            .collect();

        let mut samples = self.store.load_weight_samples()?;
        samples.extend(new_samples.iter().cloned());
        samples.sort_by_key(|s| s.date);
        self.store.save_weight_samples(&samples)?;

        let summary = WeighingSummary::of(&new_samples);
        tracing::info!(
            "Weighed house {} cage {} on {}: {} layer(s), mean {}g, age {}",
            house,
            input.cage,
            input.date,
            new_samples.len(),
            summary.mean_weight_g,
            resolution.age
        );

        Ok(MutationOutcome::new(
            CageWeighing {
                age: resolution.age,
                samples: new_samples,
                summary,
            },
            resolution.warning(input.date).into_iter().collect(),
        ))
    }

    /// Overwrite fields of the sample at `index`; the mean is re-derived
    pub fn update(
        &self,
        index: usize,
        changes: UpdateWeightInput,
    ) -> AppResult<MutationOutcome<WeightSample>> {
        validate_input(&changes)?;

        let mut samples = self.store.load_weight_samples()?;
        let sample = samples
            .get_mut(index)
            .ok_or_else(|| AppError::record_not_found(SheetName::WeightSamples, index))?;

        if let Some(cage) = changes.cage {
            sample.cage = cage;
        }
        if let Some(layer) = changes.layer {
            sample.layer = layer;
        }
        if let Some(sample_count) = changes.sample_count {
            sample.sample_count = sample_count;
        }
        if let Some(total_weight_kg) = changes.total_weight_kg {
            sample.total_weight_kg = total_weight_kg;
        }
        if let Some(age) = changes.age {
            sample.age = age;
        }
        validate_sample(sample.sample_count, sample.total_weight_kg)?;
        sample.refresh_mean();

        let updated = sample.clone();
        self.store.save_weight_samples(&samples)?;
        tracing::info!("Updated weight sample {}", index);

        Ok(MutationOutcome::new(updated, Vec::new()))
    }

    pub fn delete(&self, index: usize) -> AppResult<MutationOutcome<WeightSample>> {
        let mut samples = self.store.load_weight_samples()?;
        if index >= samples.len() {
            return Err(AppError::record_not_found(SheetName::WeightSamples, index));
        }

        let removed = samples.remove(index);
        self.store.save_weight_samples(&samples)?;
        tracing::info!("Deleted weight sample {} from {}", index, removed.date);

        Ok(MutationOutcome::new(removed, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySheetStore;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn layer(layer: Layer, sample_count: u32, kg: i64) -> LayerSampleInput {
        LayerSampleInput {
            layer,
            sample_count,
            total_weight_kg: Decimal::from(kg),
        }
    }

    fn weighing(layers: Vec<LayerSampleInput>) -> RecordWeighingInput {
        RecordWeighingInput {
            date: d(10),
            house: 2,
            cage: 15,
            layers,
        }
    }

    #[test]
    fn test_summary_over_layers() {
        let service = WeightSampleService::new(Arc::new(MemorySheetStore::new()));
        let outcome = service
            .record_weighing(weighing(vec![
                layer(Layer::First, 20, 4),
                layer(Layer::Second, 20, 6),
                layer(Layer::Third, 0, 0),
            ]))
            .unwrap();

        let weighing = outcome.record;
        assert_eq!(weighing.samples.len(), 2);
        assert_eq!(weighing.summary.total_samples, 40);
        assert_eq!(weighing.summary.total_weight_kg, Decimal::from(10));
        assert_eq!(weighing.summary.mean_weight_g, Decimal::from(250));
        assert_eq!(weighing.age, 1);
    }

    #[test]
    fn test_repeated_layer_rejected() {
        let service = WeightSampleService::new(Arc::new(MemorySheetStore::new()));
        let err = service
            .record_weighing(weighing(vec![
                layer(Layer::First, 20, 4),
                layer(Layer::First, 10, 2),
            ]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "layers"));
    }

    #[test]
    fn test_all_empty_layers_rejected() {
        let service = WeightSampleService::new(Arc::new(MemorySheetStore::new()));
        let err = service
            .record_weighing(weighing(vec![layer(Layer::First, 0, 0)]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(service.samples(None).unwrap().is_empty());
    }

    #[test]
    fn test_cage_out_of_range_rejected() {
        let service = WeightSampleService::new(Arc::new(MemorySheetStore::new()));
        let mut input = weighing(vec![layer(Layer::First, 20, 4)]);
        input.cage = 101;
        let err = service.record_weighing(input).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "cage"));
    }

    #[test]
    fn test_oversized_layers_rejected_before_totals() {
        let service = WeightSampleService::new(Arc::new(MemorySheetStore::new()));
        let err = service
            .record_weighing(weighing(vec![
                layer(Layer::First, 4_000_000_000, 4),
                layer(Layer::Second, 4_000_000_000, 4),
            ]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "sample_count"));

        let err = service
            .record_weighing(weighing(vec![layer(Layer::First, 20, 51)]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "total_weight_kg"));
        assert!(service.samples(None).unwrap().is_empty());
    }

    #[test]
    fn test_update_rejects_oversized_sample() {
        let service = WeightSampleService::new(Arc::new(MemorySheetStore::new()));
        service
            .record_weighing(weighing(vec![layer(Layer::First, 20, 4)]))
            .unwrap();
        let changes = UpdateWeightInput {
            sample_count: Some(101),
            ..Default::default()
        };
        let err = service.update(0, changes).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "sample_count"));
        assert_eq!(service.samples(None).unwrap()[0].sample_count, 20);
    }
}
