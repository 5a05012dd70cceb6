//! Analog sampling abstractions
//!
//! The sampler converts against the supply rail (Vcc) as reference. Reading
//! the internal bandgap against that reference is what lets the core
//! back-calculate the true supply voltage.

/// Errors from analog conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not produce a result
    Conversion,
}

/// Raw ADC sampler
///
/// Both reads may block briefly while the reference/multiplexer settles.
/// Samples are raw codes in `0..FULL_SCALE`.
pub trait AnalogSampler {
    /// Identifies an external analog input
    type Channel: Copy;

    /// Number of distinct codes the converter produces (1024 for 10-bit)
    const FULL_SCALE: u16 = 1024;

    /// Sample the internal bandgap reference against the supply rail
    fn read_bandgap(&mut self) -> Result<u16, AdcError>;

    /// Sample an external channel against the supply rail
    fn read_channel(&mut self, channel: Self::Channel) -> Result<u16, AdcError>;
}
