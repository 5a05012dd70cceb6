//! Bandgap Firmware
//!
//! Supply monitor for STM32F042K6 boards. Reports the VDDA estimated from
//! VREFINT, and one analog pin scaled against it, over the USART2 console
//! once a second. Pressing Space on the console opens the interactive
//! calibration of the reference; the result is kept in the last flash page.

#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::{debug, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_stm32::adc::{self, Adc, AdcChannel};
use embassy_stm32::bind_interrupts;
use embassy_stm32::flash::{Blocking, Flash};
use embassy_stm32::peripherals::{ADC1, USART2};
use embassy_stm32::usart::{self, BufferedUart};
use embassy_time::{Duration, Timer};
use embedded_storage::nor_flash::RmwNorFlashStorage;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use bandgap_core::calibration::{CalibrationSession, SessionPoll};
use bandgap_core::config::CalibrationConfig;
use bandgap_core::keys::{Key, KeyDecoder};
use bandgap_core::persistence::BandgapStore;
use bandgap_core::PrecisionAdc;
use bandgap_hal::clock::deadline_reached;
use bandgap_hal::{Clock, FmtWriter};
use bandgap_hal_stm32f0::adc::VREFINT_TYPICAL_MV;
use bandgap_hal_stm32f0::flash::FLASH_PAGE_SIZE;
use bandgap_hal_stm32f0::uart::CONSOLE_BAUDRATE;
use bandgap_hal_stm32f0::{ConsoleUart, EmbassyClock, PageWindow, VrefintSampler};

bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<USART2>;
    ADC1 => adc::InterruptHandler<ADC1>;
});

type Console = ConsoleUart<BufferedUart<'static>>;
type RecordStorage = RmwNorFlashStorage<'static, PageWindow<Flash<'static, Blocking>>>;
type Meter = PrecisionAdc<VrefintSampler<'static, 1>, RecordStorage>;

/// Telemetry interval
const REPORT_INTERVAL_MS: u32 = 1000;

/// Console polling interval
const POLL_INTERVAL_MS: u64 = 10;

/// Analog pin reported alongside the supply (PA0)
const SENSE_CHANNEL: usize = 0;

static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
static MERGE_BUF: StaticCell<[u8; FLASH_PAGE_SIZE]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Bandgap firmware starting...");

    let p = embassy_stm32::init(Default::default());

    // ADC: VREFINT plus PA0 as the sense input
    let adc = Adc::new(p.ADC1, Irqs);
    let sampler = VrefintSampler::new(adc, [p.PA0.degrade_adc()]);

    // Calibration record in the last flash page
    let flash = Flash::new_blocking(p.FLASH);
    let storage = RmwNorFlashStorage::new(
        PageWindow::last_page(flash),
        MERGE_BUF.init([0; FLASH_PAGE_SIZE]),
    );

    // The F0 internal reference sits higher than the AVR bandgap
    let config = CalibrationConfig {
        nominal_reference_mv: VREFINT_TYPICAL_MV,
        ..Default::default()
    };
    let meter = PrecisionAdc::with_store(sampler, BandgapStore::new(storage), config);
    info!("Bandgap reference: {}mV", meter.reference());

    // Console on USART2 (PA2=TX, PA3=RX)
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = CONSOLE_BAUDRATE;

    let uart = unwrap!(BufferedUart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        TX_BUF.init([0; 256]),
        RX_BUF.init([0; 32]),
        Irqs,
        uart_config,
    ));

    unwrap!(spawner.spawn(console_task(meter, ConsoleUart::new(uart))));

    info!("Console task spawned");
}

/// Console task - periodic telemetry, calibration on demand
#[embassy_executor::task]
async fn console_task(mut meter: Meter, mut console: Console) {
    let clock = EmbassyClock;
    let decoder = KeyDecoder::default();

    {
        let mut out = FmtWriter::new(&mut console);
        if writeln!(out, "\nPress [Space] to calibrate the bandgap reference.").is_err() {
            warn!("Console write failed: {:?}", out.take_error());
        }
    }

    let mut next_report = clock.now_ms();

    loop {
        if decoder.read_key(&mut console, &clock) == Some(Key::Space) {
            info!("Entering calibration");
            calibrate(&mut meter, &mut console, &clock).await;
            info!("Calibration done, reference {}mV", meter.reference());
            next_report = clock.now_ms();
        }

        if deadline_reached(clock.now_ms(), next_report) {
            report(&mut meter, &mut console);
            next_report = next_report.wrapping_add(REPORT_INTERVAL_MS);
        }

        Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Poll a calibration session until the user leaves it
///
/// Yields to the executor between polls; a poll only blocks while a key
/// sequence is arriving.
async fn calibrate(meter: &mut Meter, console: &mut Console, clock: &EmbassyClock) {
    let mut session = CalibrationSession::new(meter, console, clock);

    loop {
        match session.poll() {
            Ok(SessionPoll::Continue) => {
                Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
            Ok(SessionPoll::Exited) => break,
            Err(e) => {
                warn!("Calibration aborted, console error: {:?}", e);
                break;
            }
        }
    }
}

/// Send one telemetry line to the console and the debug log
fn report(meter: &mut Meter, console: &mut Console) {
    let vcc = meter.read_vcc();
    let sense = meter.read_millivolts(SENSE_CHANNEL);
    let reference = meter.reference();

    let mut out = FmtWriter::new(console);
    let written = match (vcc, sense) {
        (Ok(vcc_mv), Ok(sense_mv)) => {
            debug!("Vcc {}mV, PA0 {}mV, ref {}mV", vcc_mv, sense_mv, reference);
            writeln!(
                out,
                "Vcc: {}mV, PA0: {}mV, BG ref: {}mV",
                vcc_mv, sense_mv, reference
            )
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Measurement failed: {}", e);
            writeln!(out, "Vcc: ERR ({}), BG ref: {}mV", e, reference)
        }
    };

    if written.is_err() {
        warn!("Console write failed: {:?}", out.take_error());
    }
}
