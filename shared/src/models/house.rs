//! House identity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::RecordError;

/// A poultry house, numbered 1 to 16
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HouseNumber(u8);

impl HouseNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 16;

    pub fn new(number: u8) -> Result<Self, RecordError> {
        if (Self::MIN..=Self::MAX).contains(&number) {
            Ok(Self(number))
        } else {
            Err(RecordError::HouseOutOfRange(i64::from(number)))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every house on the farm, in order
    pub fn all() -> impl Iterator<Item = HouseNumber> {
        (Self::MIN..=Self::MAX).map(HouseNumber)
    }
}

impl TryFrom<u8> for HouseNumber {
    type Error = RecordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HouseNumber> for u8 {
    fn from(house: HouseNumber) -> Self {
        house.0
    }
}

impl fmt::Display for HouseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HouseNumber {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: i64 = s
            .trim()
            .parse()
            .map_err(|_| RecordError::UnknownSheet(s.to_string()))?;
        u8::try_from(number)
            .map_err(|_| RecordError::HouseOutOfRange(number))
            .and_then(Self::new)
    }
}
