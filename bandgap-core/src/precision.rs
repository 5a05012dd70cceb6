//! Precision ADC front end
//!
//! [`PrecisionAdc`] owns the sampler, the persistence adapter and the
//! calibrated bandgap reference, and exposes the measurement, persistence
//! and interactive calibration entry points.

use bandgap_hal::{AdcError, AnalogSampler, Clock, Storage, UartRx, UartTx};

use crate::calibration::CalibrationSession;
use crate::config::CalibrationConfig;
use crate::estimator::{estimate_supply, scale_reading, EstimateError};
use crate::persistence::{BandgapStore, PersistError};

/// Failure to produce a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// Converter fault
    Adc(AdcError),
    /// Bandgap sample unusable for estimation
    Estimate(EstimateError),
}

impl From<AdcError> for ReadError {
    fn from(e: AdcError) -> Self {
        ReadError::Adc(e)
    }
}

impl From<EstimateError> for ReadError {
    fn from(e: EstimateError) -> Self {
        ReadError::Estimate(e)
    }
}

impl core::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::Adc(AdcError::Conversion) => f.write_str("conversion failed"),
            ReadError::Estimate(e) => core::fmt::Display::fmt(e, f),
        }
    }
}

/// Bandgap-corrected voltage measurement
pub struct PrecisionAdc<A, F> {
    sampler: A,
    store: BandgapStore<F>,
    reference_mv: u16,
    config: CalibrationConfig,
}

impl<A: AnalogSampler, F: Storage> PrecisionAdc<A, F> {
    /// Create with default settings
    ///
    /// Adopts the persisted reference if one is found at the end of
    /// `storage`, otherwise the nominal 1100mV.
    pub fn new(sampler: A, storage: F) -> Self {
        Self::with_store(sampler, BandgapStore::new(storage), CalibrationConfig::default())
    }

    /// Create over an explicit store, falling back to the configured nominal
    pub fn with_store(sampler: A, mut store: BandgapStore<F>, config: CalibrationConfig) -> Self {
        let reference_mv = match store.load() {
            Some(mv) => mv,
            None => {
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "no saved bandgap reference, using nominal {}mV",
                    config.nominal_reference_mv
                );
                config.nominal_reference_mv
            }
        };

        Self {
            sampler,
            store,
            reference_mv,
            config,
        }
    }

    /// Create with a known reference, ignoring anything persisted
    pub fn with_reference(sampler: A, storage: F, reference_mv: u16) -> Self {
        Self {
            sampler,
            store: BandgapStore::new(storage),
            reference_mv,
            config: CalibrationConfig::default(),
        }
    }

    /// Calibrated bandgap voltage in mV
    pub fn reference(&self) -> u16 {
        self.reference_mv
    }

    pub fn set_reference(&mut self, reference_mv: u16) {
        self.reference_mv = reference_mv;
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CalibrationConfig) {
        self.config = config;
    }

    pub fn store(&self) -> &BandgapStore<F> {
        &self.store
    }

    /// Measure the supply voltage in mV
    pub fn read_vcc(&mut self) -> Result<u32, ReadError> {
        let raw = self.sampler.read_bandgap()?;
        Ok(estimate_supply(raw, self.reference_mv, A::FULL_SCALE)?)
    }

    /// Measure `channel` in mV
    ///
    /// Samples the supply first, then the channel, so both reflect the
    /// same rail as closely as possible.
    pub fn read_millivolts(&mut self, channel: A::Channel) -> Result<u32, ReadError> {
        let supply_mv = self.read_vcc()?;
        let raw = self.sampler.read_channel(channel)?;
        Ok(scale_reading(raw, supply_mv, A::FULL_SCALE))
    }

    /// Persist the current reference
    pub fn save(&mut self) -> Result<(), PersistError> {
        self.store.save(self.reference_mv)
    }

    /// Adopt the persisted reference
    ///
    /// Returns `false` and leaves the reference untouched when nothing
    /// valid is stored.
    pub fn load(&mut self) -> bool {
        match self.store.load() {
            Some(mv) => {
                self.reference_mv = mv;
                true
            }
            None => false,
        }
    }

    /// Run the interactive calibration on `console` until the user exits
    ///
    /// Only console write failures abort the session.
    pub fn calibrate<S, C>(&mut self, console: &mut S, clock: &C) -> Result<(), <S as UartTx>::Error>
    where
        S: UartRx + UartTx,
        C: Clock,
    {
        CalibrationSession::new(self, console, clock).run()
    }

    /// Give back the owned collaborators
    pub fn release(self) -> (A, F) {
        (self.sampler, self.store.into_inner())
    }
}
