//! Host-side stand-ins for the hardware collaborators

use core::cell::Cell;
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use bandgap_hal::clock::deadline_reached;
use bandgap_hal::{AdcError, AnalogSampler, Clock, ReadStorage, Storage, UartRx, UartTx};

/// Millisecond clock that ticks once per reading
///
/// Every `now_ms` call advances time by 1ms, so busy-wait loops make
/// progress without a real timer.
pub struct SimClock {
    now: Cell<u32>,
}

impl SimClock {
    pub fn new(start: u32) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Current time without ticking
    pub fn peek(&self) -> u32 {
        self.now.get()
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(1));
        now
    }
}

/// Console whose input bytes become readable at scripted times
pub struct ScriptedConsole<'c> {
    clock: &'c SimClock,
    incoming: VecDeque<(u32, u8)>,
    output: Vec<u8>,
    /// Number of upcoming `read_byte` calls that fail
    pub read_faults: usize,
    /// `read_ready` reports a line error
    pub fail_ready: bool,
    /// Every write is rejected
    pub fail_writes: bool,
}

impl<'c> ScriptedConsole<'c> {
    pub fn new(clock: &'c SimClock) -> Self {
        Self {
            clock,
            incoming: VecDeque::new(),
            output: Vec::new(),
            read_faults: 0,
            fail_ready: false,
            fail_writes: false,
        }
    }

    /// Queue `bytes` to arrive at time `at`
    pub fn send_at(&mut self, at: u32, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().map(|&b| (at, b)));
    }

    /// Queue `bytes` to arrive now
    pub fn send(&mut self, bytes: &[u8]) {
        let now = self.clock.peek();
        self.send_at(now, bytes);
    }

    fn arrived(&self) -> bool {
        self.incoming
            .front()
            .is_some_and(|&(at, _)| deadline_reached(self.clock.peek(), at))
    }

    pub fn pending(&self) -> usize {
        self.incoming.len()
    }

    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

impl UartRx for ScriptedConsole<'_> {
    type Error = ();

    // Polling takes time too, so idle loops still see scripted bytes arrive
    fn read_ready(&mut self) -> Result<bool, ()> {
        self.clock.advance(1);
        if self.fail_ready {
            return Err(());
        }
        Ok(self.arrived())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ()> {
        if self.read_faults > 0 {
            self.read_faults -= 1;
            return Err(());
        }
        if self.arrived() {
            Ok(self.incoming.pop_front().map(|(_, b)| b))
        } else {
            Ok(None)
        }
    }
}

impl UartTx for ScriptedConsole<'_> {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        if self.fail_writes {
            return Err(());
        }
        self.output.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// 10-bit sampler returning fixed codes
pub struct SimSampler {
    pub bandgap: u16,
    pub channels: [u16; 4],
    pub fail: bool,
}

impl SimSampler {
    pub fn new(bandgap: u16) -> Self {
        Self {
            bandgap,
            channels: [0; 4],
            fail: false,
        }
    }
}

impl AnalogSampler for SimSampler {
    type Channel = usize;

    fn read_bandgap(&mut self) -> Result<u16, AdcError> {
        if self.fail {
            return Err(AdcError::Conversion);
        }
        Ok(self.bandgap)
    }

    fn read_channel(&mut self, channel: usize) -> Result<u16, AdcError> {
        if self.fail {
            return Err(AdcError::Conversion);
        }
        self.channels.get(channel).copied().ok_or(AdcError::Conversion)
    }
}

/// Byte-addressable in-memory storage
pub struct MemStorage<const N: usize> {
    pub bytes: [u8; N],
    pub fail_writes: bool,
    pub fail_reads: bool,
}

impl<const N: usize> MemStorage<N> {
    /// Every byte 0xFF, as after a chip erase
    pub fn erased() -> Self {
        Self::filled(0xFF)
    }

    pub fn zeroed() -> Self {
        Self::filled(0x00)
    }

    fn filled(value: u8) -> Self {
        Self {
            bytes: [value; N],
            fail_writes: false,
            fail_reads: false,
        }
    }
}

impl<const N: usize> ReadStorage for MemStorage<N> {
    type Error = ();

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), ()> {
        let start = offset as usize;
        let end = start.checked_add(bytes.len()).ok_or(())?;
        if self.fail_reads || end > N {
            return Err(());
        }
        bytes.copy_from_slice(&self.bytes[start..end]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Storage for MemStorage<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), ()> {
        let start = offset as usize;
        let end = start.checked_add(bytes.len()).ok_or(())?;
        if self.fail_writes || end > N {
            return Err(());
        }
        self.bytes[start..end].copy_from_slice(bytes);
        Ok(())
    }
}
