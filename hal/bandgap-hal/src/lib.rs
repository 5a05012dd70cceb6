//! Bandgap Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the measurement and calibration
//! logic in `bandgap-core` is written against. Chip-specific HALs
//! (STM32F0, ...) implement them, and host tests substitute simulated ones.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (bandgap-firmware, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bandgap-core (estimator, calibration)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bandgap-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ bandgap-hal-  │
//!             │   stm32f0     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`adc::AnalogSampler`] - Raw bandgap and channel conversions
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial console byte stream
//! - [`clock::Clock`] - Free-running millisecond counter
//! - [`storage::Storage`] - Byte-addressable persistent storage

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod storage;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogSampler};
pub use clock::Clock;
pub use storage::{ReadStorage, Storage};
pub use uart::{FmtWriter, UartRx, UartTx};
