//! Daily house records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::HouseNumber;
use crate::age::AgeAnchor;
use crate::types::{sheet_date, Dated};

/// One day of feed, mortality and culling for a house
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    #[serde(with = "sheet_date")]
    pub date: NaiveDate,
    pub house: HouseNumber,
    /// Day of age of the flock
    pub age: u32,
    pub feed_kg: Decimal,
    pub deaths: u32,
    pub culls: u32,
    /// Head count remaining after this day's losses. Always derived.
    #[serde(default)]
    pub stock: i64,
}

impl DailyRecord {
    /// Create a record whose stock is still to be computed
    pub fn new(
        date: NaiveDate,
        house: HouseNumber,
        age: u32,
        feed_kg: Decimal,
        deaths: u32,
        culls: u32,
    ) -> Self {
        Self {
            date,
            house,
            age,
            feed_kg,
            deaths,
            culls,
            stock: 0,
        }
    }

    /// Birds lost on this day
    pub fn losses(&self) -> i64 {
        i64::from(self.deaths) + i64::from(self.culls)
    }

    pub fn anchor(&self) -> AgeAnchor {
        AgeAnchor::new(self.date, self.age)
    }

    /// Short row description for maintenance listings
    pub fn describe(&self) -> String {
        format!("feed {}kg deaths {} culls {}", self.feed_kg, self.deaths, self.culls)
    }
}

impl Dated for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
