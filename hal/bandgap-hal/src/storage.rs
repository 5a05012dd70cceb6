//! Persistent storage abstractions
//!
//! Persistence goes through the `embedded-storage` byte-addressable traits,
//! which fit EEPROM directly and NOR flash through
//! [`embedded_storage::nor_flash::RmwNorFlashStorage`].

pub use embedded_storage::{ReadStorage, Storage};

