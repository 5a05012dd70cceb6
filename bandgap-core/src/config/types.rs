//! Configuration type definitions

/// Nominal bandgap voltage in mV
///
/// The real value lies somewhere between 1000 and 1200 mV and is fixed for
/// each individual chip, which is why it gets calibrated.
pub const NOMINAL_REFERENCE_MV: u16 = 1100;

/// Practical lower bound of a bandgap reference (mV)
pub const MIN_PLAUSIBLE_REFERENCE_MV: u16 = 1000;

/// Practical upper bound of a bandgap reference (mV)
pub const MAX_PLAUSIBLE_REFERENCE_MV: u16 = 1200;

/// Default key decoder inter-byte window (ms)
pub const DEFAULT_KEY_TIMEOUT_MS: u16 = 100;

/// Default live Vcc refresh interval while tuning (ms)
pub const DEFAULT_REFRESH_INTERVAL_MS: u32 = 1000;

/// Calibration session parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationConfig {
    /// How long the key decoder waits for the next byte of a sequence
    pub key_timeout_ms: u16,
    /// Live Vcc display cadence in the tuning state
    pub refresh_interval_ms: u32,
    /// Reference used when nothing valid is persisted
    pub nominal_reference_mv: u16,
    /// Adjustment applied per up/down key press
    pub step_mv: u16,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            key_timeout_ms: DEFAULT_KEY_TIMEOUT_MS,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            nominal_reference_mv: NOMINAL_REFERENCE_MV,
            step_mv: 1,
        }
    }
}

impl CalibrationConfig {
    /// Whether a reference value falls in the range real bandgaps occupy
    pub fn is_plausible(reference_mv: u16) -> bool {
        (MIN_PLAUSIBLE_REFERENCE_MV..=MAX_PLAUSIBLE_REFERENCE_MV).contains(&reference_mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CalibrationConfig::default();
        assert_eq!(config.key_timeout_ms, 100);
        assert_eq!(config.refresh_interval_ms, 1000);
        assert_eq!(config.nominal_reference_mv, 1100);
        assert_eq!(config.step_mv, 1);
    }

    #[test]
    fn test_plausible_range() {
        assert!(CalibrationConfig::is_plausible(1000));
        assert!(CalibrationConfig::is_plausible(1125));
        assert!(CalibrationConfig::is_plausible(1200));
        assert!(!CalibrationConfig::is_plausible(999));
        assert!(!CalibrationConfig::is_plausible(0xFFFF));
    }
}
