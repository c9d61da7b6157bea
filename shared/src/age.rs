//! Day-of-age resolution
//!
//! A house's age clock is anchored on the (date, age) pairs already on its
//! sheet. Any other date gets its age by counting calendar days from the
//! nearest usable anchor:
//!
//! - no anchors: day 1
//! - before the first anchor: count backwards, never below day 1
//! - after the last anchor: count forwards
//! - in between: count forwards from the closest anchor at or before the
//!   date. Gaps are trusted as one day per day; a later anchor that
//!   disagrees is not consulted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Dated;
use crate::warning::InconsistencyWarning;

/// Age of the first day of a flock
pub const FIRST_DAY_OF_AGE: u32 = 1;

/// A known (date, age) point of a house's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeAnchor {
    pub date: NaiveDate,
    pub age: u32,
}

impl AgeAnchor {
    pub fn new(date: NaiveDate, age: u32) -> Self {
        Self { date, age }
    }
}

impl Dated for AgeAnchor {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// How a resolved age was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum AgeBasis {
    NoHistory,
    BeforeHistory { earliest: NaiveDate, clamped: bool },
    AfterHistory { latest: NaiveDate },
    WithinHistory { anchor: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResolution {
    pub age: u32,
    #[serde(flatten)]
    pub basis: AgeBasis,
}

impl AgeResolution {
    /// Warning to surface for a resolution made against `target`
    pub fn warning(&self, target: NaiveDate) -> Option<InconsistencyWarning> {
        match self.basis {
            AgeBasis::BeforeHistory { earliest, clamped } => {
                Some(InconsistencyWarning::DateBeforeHistory {
                    date: target,
                    earliest,
                    age_clamped: clamped,
                })
            }
            _ => None,
        }
    }
}

/// Resolve the age to stamp on a record dated `target`
pub fn resolve_age(history: &[AgeAnchor], target: NaiveDate) -> u32 {
    resolve_age_with_basis(history, target).age
}

/// Like [`resolve_age`], also reporting which anchor was used
pub fn resolve_age_with_basis(history: &[AgeAnchor], target: NaiveDate) -> AgeResolution {
    let mut anchors = history.to_vec();
    anchors.sort_by_key(|a| a.date);

    let (Some(first), Some(last)) = (anchors.first().copied(), anchors.last().copied()) else {
        return AgeResolution {
            age: FIRST_DAY_OF_AGE,
            basis: AgeBasis::NoHistory,
        };
    };

    if target < first.date {
        let extrapolated = i64::from(first.age) - (first.date - target).num_days();
        let clamped = extrapolated < i64::from(FIRST_DAY_OF_AGE);
        return AgeResolution {
            age: to_age(extrapolated.max(i64::from(FIRST_DAY_OF_AGE))),
            basis: AgeBasis::BeforeHistory {
                earliest: first.date,
                clamped,
            },
        };
    }

    if target > last.date {
        return AgeResolution {
            age: advance(last, target),
            basis: AgeBasis::AfterHistory { latest: last.date },
        };
    }

    // first.date <= target, so at least one anchor qualifies
    let preceding = anchors.partition_point(|a| a.date <= target);
    let anchor = anchors[preceding - 1];
    AgeResolution {
        age: advance(anchor, target),
        basis: AgeBasis::WithinHistory {
            anchor: anchor.date,
        },
    }
}

fn advance(anchor: AgeAnchor, target: NaiveDate) -> u32 {
    to_age(i64::from(anchor.age) + (target - anchor.date).num_days())
}

fn to_age(days: i64) -> u32 {
    u32::try_from(days).unwrap_or(if days < 0 { 0 } else { u32::MAX })
}
