//! Cage weighing samples

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::HouseNumber;
use crate::types::{sheet_date, Dated};
use crate::validation::RecordError;

/// Tier within a weighing cage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Layer {
    First,
    Second,
    Third,
    Fourth,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::First, Layer::Second, Layer::Third, Layer::Fourth];

    pub fn number(self) -> u8 {
        match self {
            Layer::First => 1,
            Layer::Second => 2,
            Layer::Third => 3,
            Layer::Fourth => 4,
        }
    }
}

impl TryFrom<u8> for Layer {
    type Error = RecordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Layer::First),
            2 => Ok(Layer::Second),
            3 => Ok(Layer::Third),
            4 => Ok(Layer::Fourth),
            other => Err(RecordError::UnknownLayer(other.to_string())),
        }
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> Self {
        layer.number()
    }
}

impl FromStr for Layer {
    type Err = RecordError;

    /// Accepts `3` as well as the sheet labels `3层` and `layer 3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .trim_start_matches("layer")
            .trim_end_matches('层')
            .trim();
        digits
            .parse::<u8>()
            .map_err(|_| RecordError::UnknownLayer(trimmed.to_string()))
            .and_then(Layer::try_from)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.number())
    }
}

/// Mean bird weight in grams from a layer sample, to one decimal place
pub fn mean_weight_grams(total_weight_kg: Decimal, sample_count: u32) -> Decimal {
    if sample_count == 0 {
        return Decimal::ZERO;
    }
    (total_weight_kg / Decimal::from(sample_count) * Decimal::from(1000)).round_dp(1)
}

/// A weighed sample from one layer of one cage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightSample {
    #[serde(with = "sheet_date")]
    pub date: NaiveDate,
    pub house: HouseNumber,
    pub cage: u32,
    pub layer: Layer,
    pub sample_count: u32,
    pub total_weight_kg: Decimal,
    /// Derived from total weight and sample count
    pub mean_weight_g: Decimal,
    pub age: u32,
}

impl WeightSample {
    pub fn new(
        date: NaiveDate,
        house: HouseNumber,
        cage: u32,
        layer: Layer,
        sample_count: u32,
        total_weight_kg: Decimal,
        age: u32,
    ) -> Self {
        Self {
            date,
            house,
            cage,
            layer,
            sample_count,
            total_weight_kg,
            mean_weight_g: mean_weight_grams(total_weight_kg, sample_count),
            age,
        }
    }

    /// Re-derive the mean after the count or total weight changed
    pub fn refresh_mean(&mut self) {
        self.mean_weight_g = mean_weight_grams(self.total_weight_kg, self.sample_count);
    }

    pub fn describe(&self) -> String {
        format!("cage {} {} mean {}g", self.cage, self.layer, self.mean_weight_g)
    }
}

impl Dated for WeightSample {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
