//! trafoctl host simulator.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  SimKnobChip   TransformerDriver   SimBoard      LogEventSink │
//! │  (KnobPort)    (OutputPort)        (Sensor+Cmd)  (EventSink)  │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ──────────────────      │
//! │                                                               │
//! │  ┌────────────────────────────┐   UpdateChannel  ┌─────────┐  │
//! │  │ Controller (control loop)  │ ───────────────▶ │ Render  │  │
//! │  │ FSM · Knob · Fault monitor │                  │ thread  │  │
//! │  └────────────────────────────┘                  └─────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `trafoctl-sim [config.json]`. Without a path the defaults are
//! used. The log level comes from `TRAFOCTL_LOG`.

use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{LevelFilter, info};

use trafoctl::adapters::config_file::JsonConfigFile;
use trafoctl::adapters::config_store::BlobConfigStore;
use trafoctl::adapters::console_log;
use trafoctl::adapters::log_sink::LogEventSink;
use trafoctl::adapters::sim::{LogDisplay, Scenario, SimBoard, SimKnobChip, SimPin, SimPwm};
use trafoctl::adapters::time::MonotonicClock;
use trafoctl::app::ports::ConfigPort;
use trafoctl::app::service::Controller;
use trafoctl::drivers::transformer::TransformerDriver;
use trafoctl::error::Error;
use trafoctl::render::channel::UpdateChannel;
use trafoctl::render::task::RenderTask;

/// Producer: control loop. Consumer: render thread.
static UPDATES: UpdateChannel = UpdateChannel::new();

/// How long to keep ticking after the last scripted step.
const RUN_OUT_MS: u32 = 500;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    console_log::init(LevelFilter::Info).map_err(|e| anyhow!("logger: {e}"))?;
    info!("trafoctl v{} (simulator)", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => JsonConfigFile::new(path).load(),
        None => BlobConfigStore::new().load(),
    }
    .map_err(Error::from)?;

    // ── 3. Render thread ──────────────────────────────────────
    let _render = std::thread::Builder::new()
        .name("render".into())
        .spawn(|| RenderTask::new(&UPDATES, LogDisplay::new()).run())?;

    // ── 4. Adapters and controller ────────────────────────────
    let output = TransformerDriver::new(SimPwm::new(), SimPin::default(), SimPin::default());
    let mut controller = Controller::new(config.clone(), SimKnobChip::new(), output, &UPDATES)?;
    let mut board = SimBoard::new();
    let mut sink = LogEventSink::new();
    let mut scenario = Scenario::demo();
    let clock = MonotonicClock::new();

    controller.start(&mut sink);
    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let period = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    let stop_at = scenario.end_ms().saturating_add(RUN_OUT_MS);
    let mut last_report = 0u32;

    loop {
        let now = clock.now_ms();
        scenario.apply(now, controller.knob_mut().port_mut(), &mut board);
        controller.tick(now, &mut board, &mut sink);

        if config.telemetry_interval_ms > 0
            && now.wrapping_sub(last_report) >= config.telemetry_interval_ms
        {
            controller.report(&mut sink);
            last_report = now;
        }

        if scenario.is_finished() && now >= stop_at {
            break;
        }
        std::thread::sleep(period);
    }

    controller.report(&mut sink);
    // Let the render thread draw the final screen.
    std::thread::sleep(Duration::from_millis(50));
    info!("simulation finished after {} ticks", controller.tick_count());
    Ok(())
}
