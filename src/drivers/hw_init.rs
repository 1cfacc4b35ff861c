//! One-shot hardware peripheral initialization.
//!
//! Configures the soil-probe ADC channel and the pump GPIO using raw
//! ESP-IDF sys calls. Called once from `main()` before the control loop
//! starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real register configuration via `esp_idf_svc::sys`.
//! On host/test: GPIO writes are recorded and ADC reads are served from
//! an injectable sample queue so tests can assert on pin levels.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::ActuatorError;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: ADC1_HANDLE is written exactly once, in `init_adc()`, before
/// the control loop or any HTTP handler task exists.  Every later access
/// (main loop and request handlers alike) is read-only, so concurrent
/// readers are sound.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
pub fn init_adc() -> Result<(), ActuatorError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        // DB_12 is the IDF-5 name for the legacy 11 dB (~3.1 V) range.
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: adc1_handle() contract, single-threaded init-path access only.
    let ret =
        unsafe { adc_oneshot_config_channel(adc1_handle(), pins::SOIL_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=soil probe)", pins::SOIL_ADC_CHANNEL);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc() -> Result<(), ActuatorError> {
    log::info!("hw_init(sim): ADC init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() and read-only
    // afterwards; the driver serialises the conversion itself, so calls
    // from the main loop and the HTTP handler task may overlap.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    sim::next_adc_sample()
}

// ── GPIO (open-drain output) ──────────────────────────────────

/// Configure a pin as an open-drain output with the internal pull-up
/// enabled.  The pin idles HIGH through the pull-up and can only sink
/// the line low.
#[cfg(target_os = "espidf")]
pub fn init_gpio_open_drain(pin: i32) -> Result<(), ActuatorError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT_OD,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: gpio_config validates the mask and writes IO-mux registers;
    // called once from main before the control loop.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioConfigFailed(ret));
    }
    info!("hw_init: GPIO{} configured (open-drain, pull-up)", pin);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_gpio_open_drain(pin: i32) -> Result<(), ActuatorError> {
    log::info!("hw_init(sim): GPIO{pin} open-drain config recorded");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_open_drain(). Main-loop only.
    let ret = unsafe { gpio_set_level(pin, if high { 1 } else { 0 }) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioWriteFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    sim::record_gpio_write(pin, high);
    Ok(())
}

// ── Host simulation backend ───────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub mod sim {
    //! In-memory stand-ins for the ADC and GPIO registers.
    //!
    //! Tests inject ADC sample sequences and inspect the log of GPIO
    //! level writes.  An exhausted sample queue keeps returning the last
    //! value, matching a real probe sitting at a steady reading.

    use std::collections::VecDeque;
    use std::sync::{Mutex, MutexGuard};

    static ADC_SAMPLES: Mutex<VecDeque<u16>> = Mutex::new(VecDeque::new());
    static ADC_LAST: Mutex<u16> = Mutex::new(0);
    static GPIO_LOG: Mutex<Vec<(i32, bool)>> = Mutex::new(Vec::new());
    static EXCLUSIVE: Mutex<()> = Mutex::new(());

    /// Exclusive handle over the sim state for one test. Clears the
    /// sample queue and the GPIO log; hold the guard for the test's
    /// duration so parallel tests cannot interleave.
    pub fn take() -> MutexGuard<'static, ()> {
        let guard = EXCLUSIVE.lock().unwrap_or_else(|e| e.into_inner());
        clear_adc_samples();
        clear_gpio_log();
        guard
    }

    /// Queue a sequence of raw ADC samples for subsequent reads.
    pub fn push_adc_samples(samples: &[u16]) {
        let mut q = ADC_SAMPLES.lock().unwrap();
        q.extend(samples.iter().copied());
    }

    /// Drop any queued samples and reset the steady-state value.
    pub fn clear_adc_samples() {
        ADC_SAMPLES.lock().unwrap().clear();
        *ADC_LAST.lock().unwrap() = 0;
    }

    pub(super) fn next_adc_sample() -> u16 {
        let mut q = ADC_SAMPLES.lock().unwrap();
        match q.pop_front() {
            Some(v) => {
                *ADC_LAST.lock().unwrap() = v;
                v
            }
            None => *ADC_LAST.lock().unwrap(),
        }
    }

    pub(super) fn record_gpio_write(pin: i32, high: bool) {
        GPIO_LOG.lock().unwrap().push((pin, high));
    }

    /// Every `(pin, level)` write since the last clear, oldest first.
    pub fn gpio_writes() -> Vec<(i32, bool)> {
        GPIO_LOG.lock().unwrap().clone()
    }

    /// The most recent level written to `pin`, if any.
    pub fn gpio_level(pin: i32) -> Option<bool> {
        GPIO_LOG
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, high)| *high)
    }

    pub fn clear_gpio_log() {
        GPIO_LOG.lock().unwrap().clear();
    }
}
