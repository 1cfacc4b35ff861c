//! System configuration parameters
//!
//! All tunable parameters for the SoilGuard controller.  Wi-Fi credentials
//! and the reconnect budget are build-time inputs (environment variables at
//! compile time); nothing here is runtime-mutable.

use serde::{Deserialize, Serialize};

/// Station network name, baked in at build time via `SOILGUARD_WIFI_SSID`.
pub const WIFI_SSID: &str = match option_env!("SOILGUARD_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "soilguard-net",
};

/// Station passphrase, baked in at build time via `SOILGUARD_WIFI_PASS`.
pub const WIFI_PASSWORD: &str = match option_env!("SOILGUARD_WIFI_PASS") {
    Some(pass) => pass,
    None => "soilguard-pass",
};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Watering ---
    /// Raw ADC reading above which the pump is driven.
    pub watering_threshold: i32,

    // --- Sampling ---
    /// Samples averaged per main-loop reading.
    pub loop_sample_count: i32,
    /// Samples averaged per HTTP status reading.
    pub status_sample_count: i32,

    // --- Timing ---
    /// Main loop poll interval (milliseconds).
    pub poll_interval_ms: u32,

    // --- Network ---
    /// Reconnect attempts before bring-up gives up permanently.
    pub wifi_max_retries: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            watering_threshold: 2000,
            loop_sample_count: 128,
            status_sample_count: 128,
            poll_interval_ms: 5_000,
            wifi_max_retries: 5,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Called once at startup; a failure here is a
    /// build/configuration mistake, not a runtime condition.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(0..=4095).contains(&self.watering_threshold) {
            return Err("watering_threshold must be 0–4095 (12-bit ADC)");
        }
        if !(1..=4096).contains(&self.loop_sample_count) {
            return Err("loop_sample_count must be 1–4096");
        }
        if !(1..=4096).contains(&self.status_sample_count) {
            return Err("status_sample_count must be 1–4096");
        }
        if !(100..=600_000).contains(&self.poll_interval_ms) {
            return Err("poll_interval_ms must be 100–600000");
        }
        if !(1..=100).contains(&self.wifi_max_retries) {
            return Err("wifi_max_retries must be 1–100");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert_eq!(c.watering_threshold, 2000);
        assert_eq!(c.loop_sample_count, 128);
        assert_eq!(c.status_sample_count, 128);
        assert_eq!(c.poll_interval_ms, 5_000);
        assert!(c.wifi_max_retries > 0);
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(SystemConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_threshold_above_adc_range() {
        let c = SystemConfig {
            watering_threshold: 4096,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_sample_count() {
        let c = SystemConfig {
            loop_sample_count: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_retry_budget() {
        let c = SystemConfig {
            wifi_max_retries: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.watering_threshold, c2.watering_threshold);
        assert_eq!(c.poll_interval_ms, c2.poll_interval_ms);
        assert_eq!(c.wifi_max_retries, c2.wifi_max_retries);
    }
}
