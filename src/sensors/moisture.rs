//! Resistive soil-moisture probe on ADC1.
//!
//! Raw counts run 0 to 4095 and rise as the soil dries out. A single
//! conversion is noisy, so every caller-visible reading is the average
//! of a burst of conversions.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the probe channel via the oneshot API (initialised
//! by hw_init). On host/test: reads from the hw_init sample queue.

use crate::drivers::hw_init;
use crate::pins;

/// Burst length used when a caller passes a non-positive sample count.
pub const DEFAULT_SAMPLE_COUNT: i32 = 64;

/// Stateless averaging sampler over the probe channel.
///
/// Holds no mutable state, so the main loop and the HTTP handler can
/// each own a copy without synchronisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoistureSensor;

impl MoistureSensor {
    pub fn new() -> Self {
        Self
    }

    /// Average `count` raw conversions, truncating toward zero.
    ///
    /// A non-positive `count` falls back to [`DEFAULT_SAMPLE_COUNT`]
    /// rather than faulting; the caller gets a valid reading either way.
    pub fn sample(&self, count: i32) -> i32 {
        let count = if count > 0 { count } else { DEFAULT_SAMPLE_COUNT };
        let mut sum: i64 = 0;
        for _ in 0..count {
            sum += i64::from(hw_init::adc1_read(pins::SOIL_ADC_CHANNEL));
        }
        (sum / i64::from(count)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_a_burst() {
        let _g = hw_init::sim::take();
        hw_init::sim::push_adc_samples(&[1000, 2000, 3000, 4000]);
        let s = MoistureSensor::new();
        assert_eq!(s.sample(4), 2500);
    }

    #[test]
    fn mean_truncates_toward_zero() {
        let _g = hw_init::sim::take();
        // 1 + 2 + 4 = 7, 7 / 3 = 2 in integer arithmetic.
        hw_init::sim::push_adc_samples(&[1, 2, 4]);
        let s = MoistureSensor::new();
        assert_eq!(s.sample(3), 2);
    }

    #[test]
    fn exhausted_queue_repeats_last_value() {
        let _g = hw_init::sim::take();
        hw_init::sim::push_adc_samples(&[1800]);
        let s = MoistureSensor::new();
        // One queued sample, seven repeats of it.
        assert_eq!(s.sample(8), 1800);
    }

    #[test]
    fn non_positive_count_uses_default_burst() {
        let _g = hw_init::sim::take();
        // 63 zeros then one spike: only a burst of exactly 64 reads the
        // spike once and averages to 6400 / 64 = 100.
        let mut samples = vec![0u16; 63];
        samples.push(6400);
        hw_init::sim::push_adc_samples(&samples);
        let s = MoistureSensor::new();
        assert_eq!(s.sample(0), 100);

        hw_init::sim::clear_adc_samples();
        hw_init::sim::push_adc_samples(&[640; 64]);
        assert_eq!(s.sample(-5), 640);
    }

    #[test]
    fn large_burst_cannot_overflow() {
        let _g = hw_init::sim::take();
        hw_init::sim::push_adc_samples(&[4095]);
        let s = MoistureSensor::new();
        assert_eq!(s.sample(4096), 4095);
    }
}
