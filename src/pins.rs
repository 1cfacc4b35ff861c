//! GPIO / peripheral pin assignments for the SoilGuard board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Water pump (low-side switch behind an open-drain pin)
// ---------------------------------------------------------------------------

/// Digital output driving the pump switch.  Open-drain, active LOW: the pin
/// can only pull the line low, an internal pull-up supplies the idle level.
pub const PUMP_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Soil-moisture sensor — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Resistive soil-moisture probe on ADC1 channel 6 (GPIO 34 on ESP32).
/// Sampled at 12-bit width with the 11 dB (~3.1 V) attenuation range.
pub const SOIL_ADC_CHANNEL: u32 = 6;
