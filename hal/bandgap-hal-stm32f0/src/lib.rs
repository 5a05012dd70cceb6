//! STM32F0-specific HAL for bandgap-referenced measurement
//!
//! Implements the `bandgap-hal` traits on top of `embassy-stm32`:
//!
//! - [`adc::VrefintSampler`] - VREFINT and analog pins on ADC1
//! - [`uart::ConsoleUart`] - Buffered USART console
//! - [`flash::PageWindow`] - One flash page exposed as NOR flash, to be
//!   wrapped in `RmwNorFlashStorage` for byte-addressable storage
//! - [`clock::EmbassyClock`] - Millisecond clock from `embassy-time`
//!
//! # Features
//!
//! - `stm32f042k6`, `stm32f042f6` - Chip selection
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod adc;
pub mod clock;
pub mod flash;
pub mod uart;

pub use adc::VrefintSampler;
pub use clock::EmbassyClock;
pub use flash::PageWindow;
pub use uart::{ConsoleUart, UartBusError};
