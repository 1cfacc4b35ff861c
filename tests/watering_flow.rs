//! End-to-end watering flow on the host simulation backends.
//!
//! Drives the same sample → decide → actuate path the firmware loop
//! runs, asserting on recorded GPIO levels and served HTTP bodies.

#![cfg(not(target_os = "espidf"))]

use soilguard::adapters::http::StatusServer;
use soilguard::config::SystemConfig;
use soilguard::control;
use soilguard::drivers::hw_init;
use soilguard::drivers::pump::PumpDriver;
use soilguard::sensors::moisture::MoistureSensor;

/// One iteration of the firmware control loop.
fn run_loop_iteration(config: &SystemConfig, sensor: &MoistureSensor, pump: &mut PumpDriver) {
    let reading = sensor.sample(config.loop_sample_count);
    if control::should_water(reading, config.watering_threshold) {
        pump.start().unwrap();
    } else {
        pump.stop().unwrap();
    }
}

#[test]
fn dry_soil_sinks_the_pump_line_and_reports_watering() {
    let _g = hw_init::sim::take();
    // Steady probe at 2500 across the whole 128-sample burst.
    hw_init::sim::push_adc_samples(&[2500; 128]);

    let config = SystemConfig::default();
    let sensor = MoistureSensor::new();
    let mut pump = PumpDriver::initialize_on(18).unwrap();
    let mut server = StatusServer::new(&config);
    server.start().unwrap();

    run_loop_iteration(&config, &sensor, &mut pump);

    assert!(pump.is_running());
    // Active LOW: the pin sinks the line while watering.
    assert_eq!(hw_init::sim::gpio_level(18), Some(false));
    assert_eq!(
        server.handle_request().unwrap(),
        r#"{"soil_humidity":2500,"watering":true}"#
    );
}

#[test]
fn wet_soil_releases_the_pump_line_and_reports_idle() {
    let _g = hw_init::sim::take();
    hw_init::sim::push_adc_samples(&[1000; 128]);

    let config = SystemConfig::default();
    let sensor = MoistureSensor::new();
    let mut pump = PumpDriver::initialize_on(18).unwrap();
    let mut server = StatusServer::new(&config);
    server.start().unwrap();

    run_loop_iteration(&config, &sensor, &mut pump);

    assert!(!pump.is_running());
    assert_eq!(hw_init::sim::gpio_level(18), Some(true));
    assert_eq!(
        server.handle_request().unwrap(),
        r#"{"soil_humidity":1000,"watering":false}"#
    );
}

#[test]
fn soil_drying_out_turns_watering_on_then_off() {
    let _g = hw_init::sim::take();

    let config = SystemConfig::default();
    let sensor = MoistureSensor::new();
    let mut pump = PumpDriver::initialize_on(18).unwrap();

    // Wet, then dry, then wet again across three poll cycles.
    hw_init::sim::push_adc_samples(&[1500]);
    run_loop_iteration(&config, &sensor, &mut pump);
    assert!(!pump.is_running());

    hw_init::sim::clear_adc_samples();
    hw_init::sim::push_adc_samples(&[2600]);
    run_loop_iteration(&config, &sensor, &mut pump);
    assert!(pump.is_running());

    hw_init::sim::clear_adc_samples();
    hw_init::sim::push_adc_samples(&[1200]);
    run_loop_iteration(&config, &sensor, &mut pump);
    assert!(!pump.is_running());
    assert_eq!(hw_init::sim::gpio_level(18), Some(true));

    // Full pin history: init release, off, on, off.
    assert_eq!(
        hw_init::sim::gpio_writes(),
        vec![(18, true), (18, true), (18, false), (18, true)]
    );
}

#[test]
fn status_endpoint_agrees_with_the_pump_decision() {
    let _g = hw_init::sim::take();

    let config = SystemConfig::default();
    let sensor = MoistureSensor::new();
    let mut pump = PumpDriver::initialize_on(18).unwrap();
    let mut server = StatusServer::new(&config);
    server.start().unwrap();

    // A steady probe feeds both the loop and the request path.
    hw_init::sim::push_adc_samples(&[2800]);
    run_loop_iteration(&config, &sensor, &mut pump);
    let body = server.handle_request().unwrap();

    assert!(pump.is_running());
    assert_eq!(body, r#"{"soil_humidity":2800,"watering":true}"#);
}

#[test]
fn watering_continues_without_the_network() {
    let _g = hw_init::sim::take();
    hw_init::sim::push_adc_samples(&[3300]);

    let config = SystemConfig::default();
    let sensor = MoistureSensor::new();
    let mut pump = PumpDriver::initialize_on(18).unwrap();

    // Bring-up failed: no server was ever started.
    let server = StatusServer::new(&config);
    assert!(server.handle_request().is_none());

    run_loop_iteration(&config, &sensor, &mut pump);
    assert!(pump.is_running());
}
