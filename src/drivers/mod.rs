//! Hardware actuator drivers.

pub mod hw_init;
pub mod pump;
