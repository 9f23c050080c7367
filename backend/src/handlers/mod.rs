//! HTTP handlers for the Controlled Substance Tracking API

pub mod adjustment;
pub mod event;
pub mod health;
pub mod medication;
pub mod period;
pub mod report;

pub use adjustment::*;
pub use event::*;
pub use health::*;
pub use medication::*;
pub use period::*;
pub use report::*;
