//! Calibration console session

use core::fmt::{self, Write};

use bandgap_hal::{AnalogSampler, Clock, FmtWriter, Storage, UartRx, UartTx};

use super::state::{Action, Adjust, SessionState};
use crate::keys::{KeyDecoder, KeyTable};
use crate::precision::PrecisionAdc;

const MENU: &str = "\n== Bandgap calibration ==\n\
    [Space] to enter calibration display.\n\
    [1] to retrieve saved bandgap value from EEPROM.\n\
    [2] to save current bandgap value to EEPROM.\n\
    [Escape]/[q] to exit calibration.\n\
    \n\
    While in calibration display, press:\n\
    [Space] to return to this menu.\n\
    [Up/Down arrows]/[k or j] to adjust bandgap voltage while\n  \
    measuring the supply voltage (Vcc) externally with\n  \
    a multimeter.\n\
    \n\
    [Space], [1], [2] or [Escape]/[q]?\n\n";

const TUNING_HEADER: &str = "-- Calibration display, [Space] for menu --\n";

type TxError<S> = <S as UartTx>::Error;

/// Outcome of one [`CalibrationSession::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionPoll {
    /// Session still active, poll again
    Continue,
    /// User left the menu
    Exited,
}

/// One interactive calibration run over a console
///
/// Drive it with [`poll`](Self::poll) from a cooperative loop, or hand it
/// the thread with [`run`](Self::run). Dropping the session between polls
/// abandons it; the reference keeps whatever value it had reached.
pub struct CalibrationSession<'a, A, F, S, C> {
    adc: &'a mut PrecisionAdc<A, F>,
    console: &'a mut S,
    clock: &'a C,
    decoder: KeyDecoder<'a>,
    state: SessionState,
    menu_pending: bool,
    last_display: u32,
}

impl<'a, A, F, S, C> CalibrationSession<'a, A, F, S, C>
where
    A: AnalogSampler,
    F: Storage,
    S: UartRx + UartTx,
    C: Clock,
{
    /// Start a session in the menu, using the default key table
    pub fn new(adc: &'a mut PrecisionAdc<A, F>, console: &'a mut S, clock: &'a C) -> Self {
        let decoder = KeyDecoder::new(KeyTable::DEFAULT, adc.config().key_timeout_ms);
        let last_display = clock.now_ms();

        #[cfg(feature = "defmt")]
        defmt::info!("calibration started, reference {}mV", adc.reference());

        Self {
            adc,
            console,
            clock,
            decoder,
            state: SessionState::Menu,
            menu_pending: true,
            last_display,
        }
    }

    /// Replace the key bindings
    pub fn with_key_table(mut self, table: KeyTable<'a>) -> Self {
        self.decoder = KeyDecoder::new(table, self.decoder.timeout_ms());
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn precision(&self) -> &PrecisionAdc<A, F> {
        &*self.adc
    }

    /// Poll until the user exits
    pub fn run(mut self) -> Result<(), TxError<S>> {
        while self.poll()? == SessionPoll::Continue {}
        Ok(())
    }

    /// Run one iteration: decode at most one key and act on it
    ///
    /// Blocks only while a key sequence is arriving.
    pub fn poll(&mut self) -> Result<SessionPoll, TxError<S>> {
        if self.menu_pending {
            self.menu_pending = false;
            self.emit(format_args!("{}", MENU))?;
        }

        let key = self.decoder.read_key(&mut *self.console, self.clock);

        match self.state.action_for(key) {
            Action::Ignore => {}
            Action::ShowMenu => self.show_menu()?,
            Action::EnterTuning => self.enter_tuning()?,
            Action::Load => self.load()?,
            Action::Save => self.save()?,
            Action::Adjust(direction) => self.adjust(direction)?,
            Action::Refresh => self.refresh()?,
            Action::Exit => {
                #[cfg(feature = "defmt")]
                defmt::info!("calibration finished, reference {}mV", self.adc.reference());
                return Ok(SessionPoll::Exited);
            }
        }

        Ok(SessionPoll::Continue)
    }

    fn show_menu(&mut self) -> Result<(), TxError<S>> {
        self.state = SessionState::Menu;
        self.emit(format_args!("{}", MENU))
    }

    fn enter_tuning(&mut self) -> Result<(), TxError<S>> {
        self.state = SessionState::Tuning;
        self.emit(format_args!("{}", TUNING_HEADER))
    }

    fn load(&mut self) -> Result<(), TxError<S>> {
        if self.adc.load() {
            self.emit(format_args!("Retrieved saved value from EEPROM.\n\n"))?;
            self.enter_tuning()
        } else {
            self.emit(format_args!("\nNo saved bandgap value found in EEPROM.\n"))
        }
    }

    fn save(&mut self) -> Result<(), TxError<S>> {
        match self.adc.save() {
            Ok(()) => {
                self.emit(format_args!("\nSaved to EEPROM.\n\n"))?;
                self.enter_tuning()
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("bandgap save failed: {}", e);
                self.emit(format_args!("\nSave failed: {}\n", e))
            }
        }
    }

    fn adjust(&mut self, direction: Adjust) -> Result<(), TxError<S>> {
        let label = match direction {
            Adjust::Up => "[up]",
            Adjust::Down => "[down]",
        };
        self.emit(format_args!("{}\n", label))?;

        let step_mv = self.adc.config().step_mv;
        let reference_mv = direction.apply(self.adc.reference(), step_mv);
        self.adc.set_reference(reference_mv);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), TxError<S>> {
        let interval_ms = self.adc.config().refresh_interval_ms;
        if self.clock.elapsed_since(self.last_display) < interval_ms {
            return Ok(());
        }

        let reference_mv = self.adc.reference();
        match self.adc.read_vcc() {
            Ok(vcc_mv) => self.emit(format_args!(
                "Vcc: {}mV, BG ref: {}mV\n",
                vcc_mv, reference_mv
            ))?,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("supply read failed: {}", e);
                self.emit(format_args!(
                    "Vcc: ERR ({}), BG ref: {}mV\n",
                    e, reference_mv
                ))?
            }
        }

        self.last_display = self.clock.now_ms();
        Ok(())
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) -> Result<(), TxError<S>> {
        let mut out = FmtWriter::new(&mut *self.console);
        match out.write_fmt(args) {
            Ok(()) => Ok(()),
            Err(_) => out.take_error().map_or(Ok(()), Err),
        }
    }
}
