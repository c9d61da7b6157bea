//! Record-keeping services for the Poultry House Records server

pub mod daily;
pub mod maintenance;
pub mod purchase;
pub mod reporting;
pub mod weight;

pub use daily::DailyRecordService;
pub use maintenance::MaintenanceService;
pub use purchase::PurchaseService;
pub use reporting::ReportingService;
pub use weight::WeightSampleService;

use serde::Serialize;
use shared::InconsistencyWarning;
use validator::Validate;

use crate::error::AppResult;

/// Result of a successful write, with any warnings it raised
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome<T> {
    pub record: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<InconsistencyWarning>,
}

impl<T> MutationOutcome<T> {
    pub fn new(record: T, warnings: Vec<InconsistencyWarning>) -> Self {
        for warning in &warnings {
            tracing::warn!("Inconsistent data: {}", warning);
        }
        Self { record, warnings }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationOutcome<U> {
        MutationOutcome {
            record: f(self.record),
            warnings: self.warnings,
        }
    }
}

/// Run derive-based input validation
pub(crate) fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input.validate()?;
    Ok(())
}
