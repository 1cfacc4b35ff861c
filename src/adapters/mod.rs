//! Platform service adapters (flash, network, HTTP).

pub mod http;
pub mod nvs;
pub mod wifi;
