//! UART serial communication abstractions
//!
//! The console is a raw duplex byte stream with no framing. The receive side
//! is polled: callers ask whether a byte is waiting before reading it.

use core::fmt;

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Whether at least one received byte is waiting
    fn read_ready(&mut self) -> Result<bool, Self::Error>;

    /// Take the next received byte, or `None` if nothing is waiting
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// Line terminator used on the console
pub const CRLF: &str = "\r\n";

/// Text sink over a [`UartTx`]
///
/// Lets the console be driven with `write!`. Bare `\n` in the formatted
/// text is expanded to `\r\n`. The first transmit error is kept so it can be
/// returned to the caller instead of the opaque [`fmt::Error`].
pub struct FmtWriter<'a, T: UartTx> {
    tx: &'a mut T,
    error: Option<T::Error>,
}

impl<'a, T: UartTx> FmtWriter<'a, T> {
    /// Wrap a transmitter
    pub fn new(tx: &'a mut T) -> Self {
        Self { tx, error: None }
    }

    /// Take the transmit error recorded by the last failed write, if any
    pub fn take_error(&mut self) -> Option<T::Error> {
        self.error.take()
    }

    fn send(&mut self, bytes: &[u8]) -> fmt::Result {
        if bytes.is_empty() {
            return Ok(());
        }
        self.tx.write_blocking(bytes).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

impl<T: UartTx> fmt::Write for FmtWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s.as_bytes();
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let line = &rest[..pos];
            // Already terminated with CR
            if line.last() == Some(&b'\r') {
                self.send(&rest[..=pos])?;
            } else {
                self.send(line)?;
                self.send(CRLF.as_bytes())?;
            }
            rest = &rest[pos + 1..];
        }
        self.send(rest)
    }
}
