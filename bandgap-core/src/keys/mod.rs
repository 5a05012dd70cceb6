//! Console key decoding
//!
//! Terminals send arrow keys as multi-byte escape sequences that start with
//! the same byte as a lone Escape press. The [`KeyTable`] lists every byte
//! sequence of interest, and the [`KeyDecoder`] matches bytes from the
//! console against it, using a short inter-byte timeout to tell a lone
//! Escape from the start of a longer sequence.

pub mod decoder;
pub mod table;

pub use decoder::KeyDecoder;
pub use table::{Key, KeyBinding, KeyTable, KeyTableError, Match, ESC, MAX_SEQUENCE_LEN};
