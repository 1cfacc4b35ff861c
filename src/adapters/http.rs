//! HTTP status endpoint.
//!
//! Serves a single route, `GET /`, returning the current soil reading
//! and watering decision as JSON. Every request takes a fresh averaged
//! reading rather than caching the main loop's; a status probe is rare
//! enough that the extra ADC burst does not matter.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real `EspHttpServer` bound to port 80.
//! - **all other targets**: request handling is exposed directly so
//!   tests can exercise the exact body the device would serve.

use log::info;

use crate::config::SystemConfig;
use crate::control::StatusReport;
use crate::error::CommsError;
use crate::sensors::moisture::MoistureSensor;

pub struct StatusServer {
    threshold: i32,
    sample_count: i32,
    sensor: MoistureSensor,
    #[cfg(target_os = "espidf")]
    server: Option<esp_idf_svc::http::server::EspHttpServer<'static>>,
    #[cfg(not(target_os = "espidf"))]
    active: bool,
}

impl StatusServer {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            threshold: config.watering_threshold,
            sample_count: config.status_sample_count,
            sensor: MoistureSensor::new(),
            #[cfg(target_os = "espidf")]
            server: None,
            #[cfg(not(target_os = "espidf"))]
            active: false,
        }
    }

    /// Take a fresh reading and render the JSON body for one request.
    fn render_status(sensor: MoistureSensor, sample_count: i32, threshold: i32) -> String {
        let reading = sensor.sample(sample_count);
        StatusReport::from_reading(reading, threshold).to_json()
    }

    #[cfg(target_os = "espidf")]
    pub fn start(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::http::server::{Configuration, EspHttpServer};
        use esp_idf_svc::http::Method;
        use esp_idf_svc::io::Write;

        if self.server.is_some() {
            return Ok(());
        }

        let mut server = EspHttpServer::new(&Configuration::default())
            .map_err(|_| CommsError::ServerStartFailed)?;

        let sensor = self.sensor;
        let sample_count = self.sample_count;
        let threshold = self.threshold;
        server
            .fn_handler("/", Method::Get, move |request| {
                let body = Self::render_status(sensor, sample_count, threshold);
                let mut response = request.into_response(
                    200,
                    Some("OK"),
                    &[("Content-Type", "application/json")],
                )?;
                response.write_all(body.as_bytes())?;
                Ok::<(), anyhow::Error>(())
            })
            .map_err(|_| CommsError::ServerStartFailed)?;

        self.server = Some(server);
        info!("http: status endpoint up on port 80");
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start(&mut self) -> Result<(), CommsError> {
        self.active = true;
        info!("http(sim): status endpoint up");
        Ok(())
    }

    /// Tear the listener down. Safe to call when already stopped.
    #[cfg(target_os = "espidf")]
    pub fn stop(&mut self) {
        if self.server.take().is_some() {
            info!("http: status endpoint stopped");
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            info!("http(sim): status endpoint stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        #[cfg(target_os = "espidf")]
        {
            self.server.is_some()
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.active
        }
    }

    /// Serve one `GET /` as the device would. `None` when stopped.
    #[cfg(not(target_os = "espidf"))]
    pub fn handle_request(&self) -> Option<String> {
        if !self.active {
            return None;
        }
        Some(Self::render_status(self.sensor, self.sample_count, self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::hw_init;

    #[test]
    fn stopped_server_serves_nothing() {
        let server = StatusServer::new(&SystemConfig::default());
        assert!(!server.is_running());
        assert!(server.handle_request().is_none());
    }

    #[test]
    fn start_stop_is_idempotent() {
        let mut server = StatusServer::new(&SystemConfig::default());
        server.start().unwrap();
        server.start().unwrap();
        assert!(server.is_running());
        server.stop();
        server.stop();
        assert!(!server.is_running());
    }

    #[test]
    fn request_reflects_a_dry_reading() {
        let _g = hw_init::sim::take();
        hw_init::sim::push_adc_samples(&[3000]);
        let mut server = StatusServer::new(&SystemConfig::default());
        server.start().unwrap();
        let body = server.handle_request().unwrap();
        assert_eq!(body, r#"{"soil_humidity":3000,"watering":true}"#);
    }

    #[test]
    fn request_reflects_a_wet_reading() {
        let _g = hw_init::sim::take();
        hw_init::sim::push_adc_samples(&[1500]);
        let mut server = StatusServer::new(&SystemConfig::default());
        server.start().unwrap();
        let body = server.handle_request().unwrap();
        assert_eq!(body, r#"{"soil_humidity":1500,"watering":false}"#);
    }
}
