//! Shared types and models for the Poultry House Records system
//!
//! This crate contains the record models and the pure record-keeping engine
//! (age resolution, stock recalculation, duplicate detection) shared between
//! the backend and the browser bindings (via WASM).

pub mod age;
pub mod duplicate;
pub mod models;
pub mod stock;
pub mod types;
pub mod validation;
pub mod warning;

pub use age::*;
pub use duplicate::*;
pub use models::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
pub use warning::*;
