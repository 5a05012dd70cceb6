//! ADC sampler for STM32F0
//!
//! The STM32F0 converts its internal reference (VREFINT, ~1.23V) against
//! VDDA, which plays the role of the AVR bandgap: the estimator recovers
//! VDDA from the VREFINT code.

use bandgap_hal::{AdcError, AnalogSampler};
use embassy_futures::block_on;
use embassy_stm32::adc::{Adc, AnyAdcChannel, Resolution, SampleTime, VrefInt};
use embassy_stm32::peripherals::ADC1;

/// Typical VREFINT voltage from the STM32F0 datasheet (mV)
pub const VREFINT_TYPICAL_MV: u16 = 1230;

/// VREFINT needs at least 4us of sampling
const SAMPLE_TIME: SampleTime = SampleTime::CYCLES239_5;

/// Samples VREFINT and a fixed set of analog pins
///
/// Channels are addressed by their index in the pin array.
pub struct VrefintSampler<'d, const N: usize> {
    adc: Adc<'d, ADC1>,
    vrefint: VrefInt,
    pins: [AnyAdcChannel<'d, ADC1>; N],
    sample_time: SampleTime,
}

impl<'d, const N: usize> VrefintSampler<'d, N> {
    /// Configure the ADC for 12-bit conversions and enable VREFINT
    pub fn new(mut adc: Adc<'d, ADC1>, pins: [AnyAdcChannel<'d, ADC1>; N]) -> Self {
        adc.set_resolution(Resolution::BITS12);
        let vrefint = adc.enable_vref();

        Self {
            adc,
            vrefint,
            pins,
            sample_time: SAMPLE_TIME,
        }
    }

    /// Use a different sample time for every conversion
    pub fn with_sample_time(mut self, sample_time: SampleTime) -> Self {
        self.sample_time = sample_time;
        self
    }
}

impl<const N: usize> AnalogSampler for VrefintSampler<'_, N> {
    type Channel = usize;

    const FULL_SCALE: u16 = 4096;

    fn read_bandgap(&mut self) -> Result<u16, AdcError> {
        Ok(block_on(self.adc.read(&mut self.vrefint, self.sample_time)))
    }

    fn read_channel(&mut self, channel: usize) -> Result<u16, AdcError> {
        let pin = self.pins.get_mut(channel).ok_or(AdcError::Conversion)?;
        Ok(block_on(self.adc.read(pin, self.sample_time)))
    }
}
