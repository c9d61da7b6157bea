//! HTTP handlers
//!
//! Every request names its own house, sheet and date; nothing is carried
//! between requests.

pub mod daily;
pub mod health;
pub mod purchase;
pub mod sheets;
pub mod weight;

pub use daily::*;
pub use health::*;
pub use purchase::*;
pub use sheets::*;
pub use weight::*;

use chrono::NaiveDate;

/// The server's local calendar date
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
