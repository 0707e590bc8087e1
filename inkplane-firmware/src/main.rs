//! Inkplane - e-paper demo firmware
//!
//! Brings up a Heltec 2.13" black/white/red panel on a Raspberry Pi Pico,
//! draws the factory test pattern with a few primitives on top, refreshes
//! once and puts the panel into deep sleep.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use inkplane_canvas::{draw_test_pattern, Point, Qyeg0213Rws800Canvas};
use inkplane_drivers::{connect, ColorPlane, DisplayModel, EpaperDisplay, Panel};
use inkplane_hal::spi::{Phase, Polarity};
use inkplane_hal::{DelayNs, SerialTransport, SpiConfig, SpiTransport};

mod board;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Inkplane demo starting...");

    let p = embassy_rp::init(Default::default());

    let mut led = Output::new(p.PIN_25, Level::Low);
    led.set_high();
    info!("Status LED on GPIO{}", board::LED_PIN);

    Timer::after_millis(board::STARTUP_DELAY_MS).await;

    if let Err(e) = board::PANEL.validate() {
        error!("Invalid panel wiring: {}", e);
        halt().await;
    }
    info!("Panel wiring: {}", board::PANEL);

    let spi_config = SpiConfig::for_panel(&board::PANEL);
    let mut rp_config = spi::Config::default();
    rp_config.frequency = spi_config.frequency;
    rp_config.polarity = match spi_config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    rp_config.phase = match spi_config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };

    let bus = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, rp_config);
    let cs = Output::new(p.PIN_20, Level::High);
    let dc = Output::new(p.PIN_14, Level::Low);
    let busy = Input::new(p.PIN_15, Pull::None);

    let transport = match SpiTransport::new(bus, cs, dc, busy) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Transport setup failed: {}", e);
            halt().await
        }
    };

    let panel = match connect(DisplayModel::Qyeg0213Rws800, transport, Delay) {
        Ok(panel) => panel,
        Err(e) => {
            error!("Panel construction failed: {}", e);
            halt().await
        }
    };
    info!("Connected {}", panel.model().name());

    match run_demo(panel) {
        Ok(()) => info!("Demo complete, panel asleep"),
        Err(DemoError::Panel) => error!("Panel operation failed"),
        Err(DemoError::Canvas(e)) => error!("Canvas error: {}", e),
    }

    led.set_low();
    halt().await;
}

/// Failure while running the demo
#[derive(Format)]
enum DemoError {
    /// Panel command failed (details logged at the call site)
    Panel,
    /// Drawing failed
    Canvas(inkplane_canvas::CanvasError),
}

/// Draw, flush, refresh and sleep
///
/// Synchronous: the 12 KB canvas lives on this stack frame, not in the task
/// future.
fn run_demo<T, D>(mut panel: Panel<T, D>) -> Result<(), DemoError>
where
    T: SerialTransport,
    T::Error: Format,
    D: DelayNs,
{
    let log = |e: inkplane_drivers::Error<T::Error>| {
        error!("Panel error: {}", e);
        DemoError::Panel
    };

    info!("Initializing panel");
    panel.initialize().map_err(log)?;

    let mut canvas = Qyeg0213Rws800Canvas::for_display(&panel).map_err(DemoError::Canvas)?;
    canvas.clear();
    draw_test_pattern(&mut canvas).map_err(DemoError::Canvas)?;

    let (width, height) = canvas.logical_size();
    let (w, h) = (i32::from(width), i32::from(height));
    canvas.draw_rectangle(Point::new(8, 8), Point::new(w - 9, 40), ColorPlane::Red, true);
    canvas.draw_circle(Point::new(w / 2, h / 2), 30, ColorPlane::Red, false);
    canvas.draw_line(Point::new(0, h - 1), Point::new(w - 1, 0), ColorPlane::Red);

    info!("Flushing {} bytes per plane", canvas.plane_len());
    canvas.flush_to_display(&mut panel).map_err(log)?;

    info!("Refreshing");
    panel.refresh().map_err(log)?;

    panel.enter_deep_sleep().map_err(log)?;
    Ok(())
}

/// Park the core
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}
