//! Shared types and models for the Controlled Substance Tracking system
//!
//! This crate contains the domain records, unit-conversion logic, and
//! validation rules shared between the backend and any reporting tooling.

pub mod conversion;
pub mod models;
pub mod types;
pub mod validation;

pub use conversion::*;
pub use models::*;
pub use types::*;
pub use validation::*;
