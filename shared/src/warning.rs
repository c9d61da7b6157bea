//! Non-fatal inconsistencies surfaced alongside successful operations

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plausible but suspicious data. The operation still completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InconsistencyWarning {
    /// The target date precedes every record of the house, so its age was
    /// extrapolated backwards (and possibly clamped to day 1)
    DateBeforeHistory {
        date: NaiveDate,
        earliest: NaiveDate,
        age_clamped: bool,
    },
    /// Cumulative deaths and culls exceed the head count
    NegativeStock { date: NaiveDate, stock: i64 },
}

impl fmt::Display for InconsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InconsistencyWarning::DateBeforeHistory {
                date,
                earliest,
                age_clamped,
            } => {
                write!(f, "{} is earlier than the first record on {}", date, earliest)?;
                if *age_clamped {
                    write!(f, " (age clamped to day 1)")?;
                }
                Ok(())
            }
            InconsistencyWarning::NegativeStock { date, stock } => {
                write!(f, "stock on {} is negative ({})", date, stock)
            }
        }
    }
}
