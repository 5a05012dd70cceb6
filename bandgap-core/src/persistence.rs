//! Bandgap reference persistence
//!
//! The calibrated reference is kept in a single fixed slot near the end of
//! persistent storage, since other users of the medium tend to start at
//! offset zero. Layout (7 bytes, postcard with fixed-width integer):
//!
//! ```text
//! ┌──────────────────────┬──────────────────┐
//! │ SIGNATURE "bgID\0"   │ reference_mv     │
//! │ 5B                   │ 2B little-endian │
//! └──────────────────────┴──────────────────┘
//! ```
//!
//! A slot is only trusted when its signature matches exactly; erased or
//! foreign content reads back as absent.

use bandgap_hal::Storage;
use serde::{Deserialize, Serialize};

/// Tag marking a slot written by this library
pub const SIGNATURE: [u8; 5] = *b"bgID\0";

/// Serialized record size in bytes
pub const RECORD_LEN: usize = 7;

/// Persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Storage medium rejected the write
    Storage,
    /// Record could not be encoded
    Serialize,
    /// Slot does not fit inside the medium
    SlotOutOfRange,
}

impl core::fmt::Display for PersistError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PersistError::Storage => f.write_str("storage write failed"),
            PersistError::Serialize => f.write_str("record encoding failed"),
            PersistError::SlotOutOfRange => f.write_str("slot outside storage"),
        }
    }
}

/// On-storage record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistedRecord {
    /// Must equal [`SIGNATURE`] for the record to be trusted
    pub signature: [u8; 5],
    /// Calibrated bandgap voltage in mV
    #[serde(with = "postcard::fixint::le")]
    pub reference_mv: u16,
}

impl PersistedRecord {
    /// Create a signed record
    pub const fn new(reference_mv: u16) -> Self {
        Self {
            signature: SIGNATURE,
            reference_mv,
        }
    }

    /// Check the signature byte-for-byte
    pub fn is_valid(&self) -> bool {
        self.signature == SIGNATURE
    }

    /// Encode into the fixed on-storage layout
    pub fn encode(&self) -> Result<[u8; RECORD_LEN], PersistError> {
        let mut buffer = [0u8; RECORD_LEN];
        let written = postcard::to_slice(self, &mut buffer)
            .map_err(|_| PersistError::Serialize)?
            .len();
        if written != RECORD_LEN {
            return Err(PersistError::Serialize);
        }
        Ok(buffer)
    }

    /// Decode raw slot bytes, returning only signed records
    pub fn decode(bytes: &[u8; RECORD_LEN]) -> Option<Self> {
        postcard::from_bytes::<Self>(bytes)
            .ok()
            .filter(Self::is_valid)
    }
}

/// Location of the record within the storage medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecordSlot {
    offset: u32,
}

impl RecordSlot {
    /// Slot at an explicit byte offset
    pub const fn at(offset: u32) -> Self {
        Self { offset }
    }

    /// Slot whose last byte is the last byte of the medium
    pub fn at_end(capacity: usize) -> Self {
        Self::at(capacity.saturating_sub(RECORD_LEN) as u32)
    }

    /// Slot one byte short of the end
    ///
    /// Matches records written by the AVR library, which placed the record
    /// at `E2END - sizeof(record)` with `E2END` the last EEPROM address.
    pub fn legacy_at_end(capacity: usize) -> Self {
        Self::at(capacity.saturating_sub(RECORD_LEN + 1) as u32)
    }

    pub const fn offset(&self) -> u32 {
        self.offset
    }

    fn fits(&self, capacity: usize) -> bool {
        (self.offset as usize)
            .checked_add(RECORD_LEN)
            .is_some_and(|end| end <= capacity)
    }
}

/// Persistence adapter owning the storage medium
pub struct BandgapStore<S> {
    storage: S,
    slot: RecordSlot,
}

impl<S: Storage> BandgapStore<S> {
    /// Store using the slot at the end of `storage`
    pub fn new(storage: S) -> Self {
        let slot = RecordSlot::at_end(storage.capacity());
        Self::with_slot(storage, slot)
    }

    pub fn with_slot(storage: S, slot: RecordSlot) -> Self {
        Self { storage, slot }
    }

    pub fn slot(&self) -> RecordSlot {
        self.slot
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage medium
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Write a signed record holding `reference_mv`
    pub fn save(&mut self, reference_mv: u16) -> Result<(), PersistError> {
        if !self.slot.fits(self.storage.capacity()) {
            return Err(PersistError::SlotOutOfRange);
        }

        let bytes = PersistedRecord::new(reference_mv).encode()?;

        self.storage
            .write(self.slot.offset(), &bytes)
            .map_err(|_| PersistError::Storage)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "saved bandgap reference {}mV at offset {}",
            reference_mv,
            self.slot.offset()
        );

        Ok(())
    }

    /// Read back a previously saved reference
    ///
    /// Returns `None` for a blank, foreign or unreadable slot.
    pub fn load(&mut self) -> Option<u16> {
        if !self.slot.fits(self.storage.capacity()) {
            return None;
        }

        let mut bytes = [0u8; RECORD_LEN];
        if self.storage.read(self.slot.offset(), &mut bytes).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("bandgap slot read failed at offset {}", self.slot.offset());
            return None;
        }

        let record = PersistedRecord::decode(&bytes)?;

        #[cfg(feature = "defmt")]
        if !crate::config::CalibrationConfig::is_plausible(record.reference_mv) {
            defmt::warn!(
                "persisted bandgap reference {}mV is outside the usual range",
                record.reference_mv
            );
        }

        Some(record.reference_mv)
    }
}
