//! Domain models for the Controlled Substance Tracking system

mod adjustment;
mod event;
mod medication;
mod reporting_period;

pub use adjustment::*;
pub use event::*;
pub use medication::*;
pub use reporting_period::*;
