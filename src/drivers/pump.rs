//! Water pump driver (low-side switch behind an open-drain pin).
//!
//! The pump is wired active LOW: sinking the line starts the motor, and
//! releasing it lets the internal pull-up stop it. There is no speed
//! control, the pump is either on or off.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real open-drain GPIO via hw_init helpers.
//! On host/test: pin writes land in the hw_init simulation log.

use log::info;

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Stopped,
    Running,
}

pub struct PumpDriver {
    pin: i32,
    state: PumpState,
}

impl PumpDriver {
    /// Configure the pump pin and leave the pump off.
    pub fn initialize() -> Result<Self, ActuatorError> {
        Self::initialize_on(pins::PUMP_GPIO)
    }

    /// Same as [`initialize`](Self::initialize) on an explicit pin.
    pub fn initialize_on(pin: i32) -> Result<Self, ActuatorError> {
        hw_init::init_gpio_open_drain(pin)?;
        // Release the line so the pull-up holds the pump off from boot.
        hw_init::gpio_write(pin, true)?;
        info!("pump: GPIO{pin} ready (off)");
        Ok(Self {
            pin,
            state: PumpState::Stopped,
        })
    }

    /// Sink the line, starting the pump. Idempotent.
    pub fn start(&mut self) -> Result<(), ActuatorError> {
        hw_init::gpio_write(self.pin, false)?;
        self.state = PumpState::Running;
        Ok(())
    }

    /// Release the line, stopping the pump. Idempotent.
    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        hw_init::gpio_write(self.pin, true)?;
        self.state = PumpState::Stopped;
        Ok(())
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PumpState::Running)
    }
}
