//! Supply voltage estimation
//!
//! The ADC converts the internal bandgap against the supply rail:
//!
//! ```text
//! code = Vbg * FULL_SCALE / Vcc   =>   Vcc = Vbg * FULL_SCALE / code
//! ```
//!
//! With the chip's actual bandgap voltage known (calibrated), this gives an
//! accurate Vcc, which in turn converts ordinary channel codes into mV.
//! Integer-only, rounding to the nearest millivolt.

/// Error at the estimation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EstimateError {
    /// Bandgap sample of zero; would divide by zero
    ZeroSample,
    /// Bandgap sample above the converter's full scale
    SampleOutOfRange,
}

impl core::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EstimateError::ZeroSample => f.write_str("zero bandgap sample"),
            EstimateError::SampleOutOfRange => f.write_str("bandgap sample out of range"),
        }
    }
}

/// Estimate the supply voltage from a raw bandgap sample
///
/// Returns `round(reference_mv * full_scale / raw_bandgap)` in mV.
///
/// # Arguments
/// - `raw_bandgap`: bandgap code measured against the supply, `1..=full_scale`
/// - `reference_mv`: the chip's bandgap voltage in mV
/// - `full_scale`: converter code count (1024 for a 10-bit ADC)
pub fn estimate_supply(
    raw_bandgap: u16,
    reference_mv: u16,
    full_scale: u16,
) -> Result<u32, EstimateError> {
    if raw_bandgap == 0 {
        return Err(EstimateError::ZeroSample);
    }
    if raw_bandgap > full_scale {
        return Err(EstimateError::SampleOutOfRange);
    }

    let numerator = reference_mv as u32 * full_scale as u32;
    let divisor = raw_bandgap as u32;

    Ok((numerator + divisor / 2) / divisor)
}

/// Convert a raw channel sample into millivolts
///
/// Linearly maps `0..=full_scale-1` onto `0..=supply_mv`, rounding to the
/// nearest mV. Samples beyond the top code are clamped to it.
pub fn scale_reading(raw_sample: u16, supply_mv: u32, full_scale: u16) -> u32 {
    let top = full_scale.saturating_sub(1).max(1) as u64;
    let raw = (raw_sample as u64).min(top);

    ((raw * supply_mv as u64 + top / 2) / top) as u32
}
