//! Configuration types
//!
//! Board-agnostic tuning parameters for measurement and calibration.

pub mod types;

pub use types::*;
