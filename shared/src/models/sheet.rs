//! Sheet naming

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::HouseNumber;
use crate::validation::RecordError;

/// One tabular sheet of the workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SheetName {
    /// Daily records of one house, keyed by its number
    House(HouseNumber),
    WeightSamples,
    Purchases,
}

impl SheetName {
    pub const WEIGHT_SAMPLES: &'static str = "weights";
    pub const PURCHASES: &'static str = "purchases";

    /// Every sheet of the workbook: sixteen houses then the shared sheets
    pub fn all() -> Vec<SheetName> {
        HouseNumber::all()
            .map(SheetName::House)
            .chain([SheetName::WeightSamples, SheetName::Purchases])
            .collect()
    }

    pub fn house(&self) -> Option<HouseNumber> {
        match self {
            SheetName::House(house) => Some(*house),
            _ => None,
        }
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetName::House(house) => write!(f, "{}", house),
            SheetName::WeightSamples => f.write_str(Self::WEIGHT_SAMPLES),
            SheetName::Purchases => f.write_str(Self::PURCHASES),
        }
    }
}

impl FromStr for SheetName {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            Self::WEIGHT_SAMPLES | "称重数据" => Ok(SheetName::WeightSamples),
            Self::PURCHASES | "采购饲料记录" => Ok(SheetName::Purchases),
            other if other.chars().all(|c| c.is_ascii_digit()) && !other.is_empty() => {
                other.parse().map(SheetName::House)
            }
            other => Err(RecordError::UnknownSheet(other.to_string())),
        }
    }
}

impl TryFrom<String> for SheetName {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SheetName> for String {
    fn from(sheet: SheetName) -> Self {
        sheet.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_names_round_trip_through_display() {
        for sheet in SheetName::all() {
            assert_eq!(sheet.to_string().parse::<SheetName>(), Ok(sheet));
        }
        assert_eq!(SheetName::all().len(), 18);
    }

    #[test]
    fn test_legacy_sheet_labels() {
        assert_eq!("称重数据".parse::<SheetName>(), Ok(SheetName::WeightSamples));
        assert_eq!("采购饲料记录".parse::<SheetName>(), Ok(SheetName::Purchases));
    }

    #[test]
    fn test_unknown_sheets() {
        assert_eq!("17".parse::<SheetName>(), Err(RecordError::HouseOutOfRange(17)));
        assert!(matches!("feed".parse::<SheetName>(), Err(RecordError::UnknownSheet(_))));
        assert!("".parse::<SheetName>().is_err());
    }
}
