//! Feed purchase records

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::HouseNumber;
use crate::types::{sheet_date, Dated};
use crate::validation::RecordError;

/// Feed formula codes stocked by the mill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedType {
    #[serde(rename = "510")]
    F510,
    #[serde(rename = "510DC")]
    F510Dc,
    #[serde(rename = "511")]
    F511,
    #[serde(rename = "513")]
    F513,
}

impl FeedType {
    pub const ALL: [FeedType; 4] = [FeedType::F510, FeedType::F510Dc, FeedType::F511, FeedType::F513];

    pub fn code(&self) -> &'static str {
        match self {
            FeedType::F510 => "510",
            FeedType::F510Dc => "510DC",
            FeedType::F511 => "511",
            FeedType::F513 => "513",
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FeedType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        FeedType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| RecordError::UnknownFeedType(code.to_string()))
    }
}

/// A feed delivery to a house
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseRecord {
    #[serde(with = "sheet_date")]
    pub date: NaiveDate,
    pub house: HouseNumber,
    pub amount_kg: u32,
    pub feed_type: FeedType,
}

impl PurchaseRecord {
    pub fn describe(&self) -> String {
        format!("purchased {}kg {}", self.amount_kg, self.feed_type)
    }
}

impl Dated for PurchaseRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
