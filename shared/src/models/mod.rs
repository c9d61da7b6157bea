//! Record models for the Poultry House Records system

mod daily;
mod house;
mod purchase;
mod sheet;
mod weight;

pub use daily::*;
pub use house::*;
pub use purchase::*;
pub use sheet::*;
pub use weight::*;
