//! Board-agnostic bandgap measurement and calibration logic
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Supply voltage estimation from the internal bandgap
//! - Console key decoding (single bytes and escape sequences)
//! - Persistence of the calibrated reference
//! - The interactive calibration state machine
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod calibration;
pub mod config;
pub mod estimator;
pub mod keys;
pub mod persistence;
pub mod precision;

#[cfg(test)]
pub(crate) mod sim;

pub use precision::{PrecisionAdc, ReadError};
