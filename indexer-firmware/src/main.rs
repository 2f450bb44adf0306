//! Game-piece indexer firmware
//!
//! Main firmware binary for the RP2040 co-processor that runs the indexer:
//! the rotating carriage, its feed wheels and the two break-beam sensors.
//! Operator buttons select the mode; the intake rollers, rumble motors and
//! status light are driven from their own tasks.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use indexer_core::actuators::ActuatorArray;
use indexer_core::config::{resolve_config, ConfigSource, IndexerConfig, MAX_STORED_SIZE};
use indexer_core::control::PositionController;
use indexer_core::sensor::SensorGate;
use indexer_core::subsystem::Indexer;
use indexer_drivers::encoder::{AbsoluteEncoder, AnalogSource};
use indexer_drivers::indicator::PulseIndicator;
use indexer_drivers::motor::{HBridgeConfig, HBridgeDrive};
use indexer_drivers::sensor::BreakBeam;

use crate::board::{Motor, RpAdc};
use crate::storage::ConfigStorage;
use crate::tasks::tick::TICK_INTERVAL_MS;

mod board;
mod channels;
mod links;
mod storage;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit indexer.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../indexer.toml");

// Must live forever for task references
static INDEXER_CONFIG: StaticCell<IndexerConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Indexer firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut storage = ConfigStorage::new(p.FLASH, p.DMA_CH0);
    let config: &'static IndexerConfig = INDEXER_CONFIG.init(load_config(&mut storage).await);
    if config.controller.nominal_period_ms != TICK_INTERVAL_MS {
        warn!(
            "Controller period {}ms differs from tick interval {}ms",
            config.controller.nominal_period_ms, TICK_INTERVAL_MS
        );
    }

    // Break beams: receiver output high while the beam is intact
    let sensors = SensorGate::new(
        BreakBeam::new(Input::new(p.PIN_2, Pull::Up)),
        BreakBeam::new(Input::new(p.PIN_3, Pull::Up)),
    );

    // Carriage encoder on ADC0
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let encoder_channel = Channel::new_pin(p.PIN_26, Pull::None);
    let source = AnalogSource::new(
        RpAdc::new(adc, encoder_channel),
        board::ADC_MAX,
        TICK_INTERVAL_MS,
    );
    let position = PositionController::new(
        AbsoluteEncoder::new(source, config.encoder),
        config.controller,
    );
    info!("Encoder initialized");

    let actuators = ActuatorArray::new(
        motor(
            Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, motor_pwm_config()),
            Output::new(p.PIN_9, Level::Low),
        ),
        motor(
            Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, motor_pwm_config()),
            Output::new(p.PIN_11, Level::Low),
        ),
        motor(
            Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, motor_pwm_config()),
            Output::new(p.PIN_13, Level::Low),
        ),
    );
    debug!("H-bridge drives: {:?}", actuators.top().config());
    let indexer = Indexer::new(actuators, sensors, position);
    info!("Indexer drives initialized");

    let intake_top = motor(
        Pwm::new_output_a(p.PWM_SLICE7, p.PIN_14, motor_pwm_config()),
        Output::new(p.PIN_15, Level::Low),
    );
    let intake_bottom = motor(
        Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, motor_pwm_config()),
        Output::new(p.PIN_17, Level::Low),
    );

    let (light_pwm, _) = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, light_pwm_config()).split();
    let light = PulseIndicator::new(unwrap!(light_pwm));
    let rumble = tasks::RumblePins {
        primary: Output::new(p.PIN_20, Level::Low),
        secondary: Output::new(p.PIN_21, Level::Low),
    };

    let buttons = tasks::OperatorButtons {
        amp: Input::new(p.PIN_4, Pull::Up),
        speaker: Input::new(p.PIN_5, Pull::Up),
        source: Input::new(p.PIN_6, Pull::Up),
    };

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::operator_task(buttons)).unwrap();
    spawner
        .spawn(tasks::intake_task(intake_top, intake_bottom))
        .unwrap();
    spawner.spawn(tasks::feedback_task(rumble, light)).unwrap();
    spawner.spawn(tasks::indexer_task(indexer, config)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Load the embedded configuration, falling back to the stored copy
///
/// A valid embedded config is written back to flash when the stored copy
/// is missing or stale.
async fn load_config(storage: &mut ConfigStorage<'_>) -> IndexerConfig {
    let mut buffer = [0u8; MAX_STORED_SIZE];
    let stored = match storage.read(&mut buffer).await {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Failed to read stored config: {:?}", e);
            None
        }
    };

    let resolved = resolve_config(EMBEDDED_CONFIG, stored);
    if let Some(e) = resolved.embedded_error {
        warn!("Rejected indexer.toml: {:?}", e);
    }
    match resolved.source {
        ConfigSource::Embedded => info!("Using embedded configuration"),
        ConfigSource::Stored => warn!("Using stored configuration"),
        ConfigSource::Default => warn!("No usable configuration, using defaults"),
    }

    if resolved.needs_store {
        match storage.write(&resolved.config).await {
            Ok(()) => info!("Stored configuration updated"),
            Err(e) => warn!("Failed to store config: {:?}", e),
        }
    }

    let config = resolved.config;
    info!(
        "Configuration loaded: settle={}ms source={}rad policy={:?}",
        config.coordinator.settle_ms,
        config.coordinator.source_angle,
        config.safety.policy
    );
    config
}

fn motor_pwm_config() -> PwmConfig {
    let mut cfg = PwmConfig::default();
    cfg.top = board::MOTOR_PWM_TOP;
    cfg.compare_a = 0;
    cfg
}

/// 50 Hz frame, one count per µs, starting at the neutral pulse
fn light_pwm_config() -> PwmConfig {
    let mut cfg = PwmConfig::default();
    cfg.divider = board::LIGHT_PWM_DIVIDER.into();
    cfg.top = board::LIGHT_PWM_TOP;
    cfg.compare_a = 1500;
    cfg
}

/// H-bridge drive on channel A of a PWM slice
fn motor(pwm: Pwm<'static>, dir: Output<'static>) -> Motor {
    let (output, _) = pwm.split();
    HBridgeDrive::new(unwrap!(output), dir, HBridgeConfig::default())
}
