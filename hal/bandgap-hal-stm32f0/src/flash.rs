//! Flash storage for STM32F0
//!
//! The F0 parts have no EEPROM, so the bandgap record lives in the last
//! flash page, well clear of the program image. [`PageWindow`] exposes that
//! page as a small NOR flash starting at offset 0; wrapping it in
//! [`RmwNorFlashStorage`](embedded_storage::nor_flash::RmwNorFlashStorage)
//! gives the byte-addressable `Storage` the persistence adapter wants.

use embedded_storage::nor_flash::{
    check_erase, check_read, check_write, ErrorType, NorFlash, NorFlashError, NorFlashErrorKind,
    ReadNorFlash,
};

/// Flash size of the STM32F042x6
pub const FLASH_SIZE: usize = 32 * 1024; // 32KB

/// Flash page size for STM32F0 series
pub const FLASH_PAGE_SIZE: usize = 1024; // 1KB pages

/// Offset of the page reserved for the bandgap record
pub const RECORD_PAGE_START: u32 = (FLASH_SIZE - FLASH_PAGE_SIZE) as u32;

/// Error from a windowed flash access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError<E> {
    /// Access outside the window or misaligned
    Access(NorFlashErrorKind),
    /// Underlying flash failed
    Flash(E),
}

impl<E: NorFlashError> NorFlashError for WindowError<E> {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            WindowError::Access(kind) => *kind,
            WindowError::Flash(e) => e.kind(),
        }
    }
}

/// Contiguous region of a larger NOR flash, addressed from zero
pub struct PageWindow<F> {
    flash: F,
    start: u32,
    size: u32,
}

impl<F: NorFlash> PageWindow<F> {
    /// Window over `size` bytes at `start` of `flash`
    ///
    /// `start` and `size` should be multiples of the erase size.
    pub fn new(flash: F, start: u32, size: u32) -> Self {
        Self { flash, start, size }
    }

    /// Window over the last flash page
    pub fn last_page(flash: F) -> Self {
        Self::new(flash, RECORD_PAGE_START, FLASH_PAGE_SIZE as u32)
    }

    pub fn into_inner(self) -> F {
        self.flash
    }
}

impl<F: ErrorType> ErrorType for PageWindow<F> {
    type Error = WindowError<F::Error>;
}

impl<F: ReadNorFlash> ReadNorFlash for PageWindow<F> {
    const READ_SIZE: usize = F::READ_SIZE;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(&*self, offset, bytes.len()).map_err(WindowError::Access)?;
        self.flash
            .read(self.start + offset, bytes)
            .map_err(WindowError::Flash)
    }

    fn capacity(&self) -> usize {
        self.size as usize
    }
}

impl<F: NorFlash> NorFlash for PageWindow<F> {
    const WRITE_SIZE: usize = F::WRITE_SIZE;
    const ERASE_SIZE: usize = F::ERASE_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(&*self, from, to).map_err(WindowError::Access)?;
        self.flash
            .erase(self.start + from, self.start + to)
            .map_err(WindowError::Flash)
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(&*self, offset, bytes.len()).map_err(WindowError::Access)?;
        self.flash
            .write(self.start + offset, bytes)
            .map_err(WindowError::Flash)
    }
}
