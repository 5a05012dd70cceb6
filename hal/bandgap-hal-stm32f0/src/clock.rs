//! Millisecond clock for STM32F0

use bandgap_hal::Clock;
use embassy_time::Instant;

/// [`Clock`] backed by the embassy time driver
///
/// The 64-bit tick count is truncated to the wrapping `u32` counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
