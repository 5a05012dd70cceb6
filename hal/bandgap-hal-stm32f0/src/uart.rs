//! UART console for STM32F0
//!
//! Adapts an interrupt-buffered USART (such as
//! `embassy_stm32::usart::BufferedUart`) to the polled byte interface the
//! key decoder expects. Transfers go through the blocking `embedded-io`
//! traits; readiness comes from `embedded-io-async`, which is where the
//! buffered driver reports it.

use bandgap_hal::{UartRx, UartTx};
use embassy_stm32::usart::Error as UsartError;
use embedded_io::{Read, Write};
use embedded_io_async::ReadReady;

/// Console baud rate, the Arduino serial monitor default
pub const CONSOLE_BAUDRATE: u32 = 115_200;

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

/// Console over a buffered USART
pub struct ConsoleUart<U> {
    uart: U,
}

impl<U> ConsoleUart<U> {
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    pub fn into_inner(self) -> U {
        self.uart
    }
}

impl<U> UartRx for ConsoleUart<U>
where
    U: Read + ReadReady,
    UartBusError: From<U::Error>,
{
    type Error = UartBusError;

    fn read_ready(&mut self) -> Result<bool, UartBusError> {
        Ok(ReadReady::read_ready(&mut self.uart)?)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, UartBusError> {
        // Read on an empty buffer would block
        if !ReadReady::read_ready(&mut self.uart)? {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        match Read::read(&mut self.uart, &mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

impl<U> UartTx for ConsoleUart<U>
where
    U: Write,
    UartBusError: From<U::Error>,
{
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartBusError> {
        Ok(self.uart.write_all(data)?)
    }

    fn flush(&mut self) -> Result<(), UartBusError> {
        Ok(self.uart.flush()?)
    }
}
