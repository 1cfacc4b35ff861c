//! SoilGuard Firmware — Main Entry Point
//!
//! Boot order matters here:
//!
//! 1. ADC + pump GPIO (a watering controller without its actuator is
//!    useless, so failures halt)
//! 2. NVS flash, then the WiFi station bring-up
//! 3. HTTP status endpoint, started whatever the bring-up outcome
//! 4. The 5-second sample/decide/actuate loop
//!
//! A station that exhausts its reconnect budget never stops the
//! controller: the loop runs degraded with the pump logic intact and
//! no remote status. Subsystem init failures, by contrast, halt.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;

use soilguard::adapters::http::StatusServer;
use soilguard::adapters::{nvs, wifi};
use soilguard::config::{self, SystemConfig};
use soilguard::control;
use soilguard::drivers::{hw_init, pump::PumpDriver};
use soilguard::sensors::moisture::MoistureSensor;

/// Everything the station needs to stay alive after bring-up.
struct Network {
    _wifi: EspWifi<'static>,
    outcome: wifi::Outcome,
}

fn start_network(config: &SystemConfig) -> Result<Network> {
    nvs::init_flash()?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_part = EspDefaultNvsPartition::take()?;
    let mut esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_part))?;

    let station = wifi::StationConfig::new(
        config::WIFI_SSID,
        config::WIFI_PASSWORD,
        config.wifi_max_retries,
    )?;
    let outcome = wifi::bring_up(&mut esp_wifi, &sysloop, &station)?;

    Ok(Network {
        _wifi: esp_wifi,
        outcome,
    })
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("SoilGuard v{} starting", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    if let Err(e) = config.validate() {
        error!("invalid configuration: {} (halting)", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 2. Actuator + sensor hardware ─────────────────────────
    if let Err(e) = hw_init::init_adc() {
        error!("HAL init failed: {} (halting)", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let mut pump = match PumpDriver::initialize() {
        Ok(p) => p,
        Err(e) => {
            error!("pump init failed: {} (halting)", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    // ── 3. Network ────────────────────────────────────────────
    // Subsystem init failures (NVS, driver setup) are configuration
    // defects and halt; a spent reconnect budget merely degrades.
    let network = match start_network(&config) {
        Ok(net) => net,
        Err(e) => {
            error!("network subsystem init failed: {} (halting)", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    if network.outcome == wifi::Outcome::FailedPermanently {
        warn!("station bring-up failed, continuing degraded");
    }

    // The endpoint starts regardless of the bring-up outcome; without an
    // address it simply never sees a request.
    let mut status_server = StatusServer::new(&config);
    if let Err(e) = status_server.start() {
        warn!("status endpoint unavailable: {e}");
    }

    // ── 4. Control loop ───────────────────────────────────────
    let sensor = MoistureSensor::new();
    info!(
        "control loop: threshold={} samples={} interval={}ms",
        config.watering_threshold, config.loop_sample_count, config.poll_interval_ms
    );

    loop {
        let reading = sensor.sample(config.loop_sample_count);
        info!("Soil humidity: {reading}");

        let result = if control::should_water(reading, config.watering_threshold) {
            pump.start()
        } else {
            pump.stop()
        };
        if let Err(e) = result {
            warn!("pump command failed: {e}");
        }

        FreeRtos::delay_ms(config.poll_interval_ms);
    }
}
