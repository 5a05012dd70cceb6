//! Incremental key decoder
//!
//! Reads console bytes until they identify exactly one key, cannot match
//! anything, or the inter-byte window elapses. Keeps no state between calls.

use bandgap_hal::{Clock, UartRx};
use heapless::Vec;

use super::table::{Key, KeyTable, MAX_SEQUENCE_LEN};
use crate::config::DEFAULT_KEY_TIMEOUT_MS;

/// Carriage return
const CR: u8 = 0x0D;
/// Line feed
const LF: u8 = 0x0A;

/// Decodes console bytes into [`Key`]s using a [`KeyTable`]
#[derive(Debug, Clone, Copy)]
pub struct KeyDecoder<'t> {
    table: KeyTable<'t>,
    timeout_ms: u16,
}

impl Default for KeyDecoder<'static> {
    fn default() -> Self {
        Self::new(KeyTable::DEFAULT, DEFAULT_KEY_TIMEOUT_MS)
    }
}

impl<'t> KeyDecoder<'t> {
    /// Create a decoder
    ///
    /// `timeout_ms` should be just long enough for a terminal to deliver all
    /// bytes of one escape sequence.
    pub fn new(table: KeyTable<'t>, timeout_ms: u16) -> Self {
        Self { table, timeout_ms }
    }

    pub fn table(&self) -> &KeyTable<'t> {
        &self.table
    }

    pub fn timeout_ms(&self) -> u16 {
        self.timeout_ms
    }

    /// Decode the next key press, if one is arriving
    ///
    /// Returns `None` at once when no byte is waiting, so display refresh in
    /// the caller's poll loop is never held up. Otherwise blocks for at most
    /// `timeout_ms` after the last accepted byte.
    pub fn read_key<R, C>(&self, rx: &mut R, clock: &C) -> Option<Key>
    where
        R: UartRx,
        C: Clock,
    {
        if !byte_waiting(rx) {
            return None;
        }

        let mut received: Vec<u8, MAX_SEQUENCE_LEN> = Vec::new();
        let mut matched = None;
        let mut last_byte_at = clock.now_ms();

        while clock.elapsed_since(last_byte_at) < self.timeout_ms as u32 {
            let byte = match rx.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => continue,
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("console read fault while decoding key");
                    continue;
                }
            };

            // Terminal line endings are noise, not part of a key
            if byte == CR || byte == LF {
                continue;
            }

            if received.push(byte).is_err() {
                break;
            }
            last_byte_at = clock.now_ms();

            let m = self.table.classify(&received);
            matched = m.full;

            // No longer sequence can still match: either this is the
            // unambiguous key, or the bytes are garbage. Any further
            // buffered bytes belong to the next key press.
            if m.partial == 0 || received.len() >= self.table.max_len() {
                return matched;
            }
        }

        // Window elapsed while waiting to disambiguate (lone ESC)
        matched
    }
}

fn byte_waiting<R: UartRx>(rx: &mut R) -> bool {
    rx.read_ready().unwrap_or(false)
}
