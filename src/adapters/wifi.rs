//! WiFi station bring-up.
//!
//! Connection progress is modelled as an explicit state machine fed by
//! link events, so the retry policy is plain data flow with no hidden
//! globals. On ESP-IDF the events come from the system event loop over
//! an mpsc channel; on the host, tests feed the machine directly.
//!
//! ## Retry policy
//!
//! Each disconnect before an address is acquired consumes one retry.
//! Once the budget is spent the bring-up resolves to a permanent
//! failure; the caller decides whether to keep running degraded.

use core::fmt;
use log::info;

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
        }
    }
}

impl std::error::Error for CredentialError {}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CredentialError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CredentialError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CredentialError::InvalidPassword);
    }
    Ok(())
}

/// Validated station credentials plus the reconnect budget.
#[derive(Debug, Clone)]
pub struct StationConfig {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
    pub max_retries: u32,
}

impl StationConfig {
    pub fn new(ssid: &str, password: &str, max_retries: u32) -> Result<Self, CredentialError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|_| CredentialError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password)
            .map_err(|_| CredentialError::InvalidPassword)?;
        Ok(Self {
            ssid: s,
            password: p,
            max_retries,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Bring-up state machine
// ───────────────────────────────────────────────────────────────

/// Link-layer events that drive the bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The station interface came up.
    StationStarted,
    /// Association was lost (or never succeeded).
    Disconnected,
    /// DHCP handed us an address; the link is usable.
    AddressAcquired,
}

/// What the caller should do after feeding an event in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Issue (or re-issue) a connect to the AP.
    IssueConnect,
    /// Nothing to do, keep waiting for events.
    Wait,
    /// Bring-up has resolved; stop feeding events.
    Done(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Connected,
    FailedPermanently,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingStart,
    Associating,
    Online,
    GaveUp,
}

/// Bring-up progress tracker. One instance per bring-up attempt.
#[derive(Debug)]
pub struct BringUp {
    phase: Phase,
    retries: u32,
    max_retries: u32,
}

impl BringUp {
    pub fn new(max_retries: u32) -> Self {
        Self {
            phase: Phase::AwaitingStart,
            retries: 0,
            max_retries,
        }
    }

    /// Disconnects consumed so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Advance the machine with one link event.
    ///
    /// Events arriving after a terminal phase are ignored; stale
    /// disconnect notifications can trail in behind an address grant.
    pub fn handle(&mut self, event: LinkEvent) -> Step {
        match (self.phase, event) {
            (Phase::Online | Phase::GaveUp, _) => Step::Wait,

            (Phase::AwaitingStart, LinkEvent::StationStarted) => {
                self.phase = Phase::Associating;
                Step::IssueConnect
            }
            (_, LinkEvent::StationStarted) => Step::Wait,

            (_, LinkEvent::AddressAcquired) => {
                self.phase = Phase::Online;
                self.retries = 0;
                Step::Done(Outcome::Connected)
            }

            (_, LinkEvent::Disconnected) => {
                if self.retries < self.max_retries {
                    self.retries += 1;
                    info!("wifi: retrying connect ({}/{})", self.retries, self.max_retries);
                    Step::IssueConnect
                } else {
                    self.phase = Phase::GaveUp;
                    Step::Done(Outcome::FailedPermanently)
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF glue
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use espidf::bring_up;

#[cfg(target_os = "espidf")]
mod espidf {
    use std::sync::mpsc;

    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::netif::IpEvent;
    use esp_idf_svc::wifi::{
        AuthMethod, ClientConfiguration, Configuration as WifiConfiguration, EspWifi, WifiEvent,
    };
    use log::{info, warn};

    use super::{BringUp, LinkEvent, Outcome, StationConfig, Step};
    use crate::error::{CommsError, Error};

    /// Configure, start and connect the station, blocking until the
    /// bring-up resolves. Event subscriptions are torn down before
    /// returning regardless of the outcome.
    pub fn bring_up(
        wifi: &mut EspWifi<'static>,
        sysloop: &EspSystemEventLoop,
        config: &StationConfig,
    ) -> Result<Outcome, Error> {
        let client = ClientConfiguration {
            ssid: config.ssid.clone(),
            password: config.password.clone(),
            auth_method: if config.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        };
        wifi.set_configuration(&WifiConfiguration::Client(client))
            .map_err(|_| CommsError::WifiInitFailed)?;

        let (tx, rx) = mpsc::channel();

        let wifi_tx = tx.clone();
        let wifi_sub = sysloop
            .subscribe::<WifiEvent, _>(move |event| match event {
                WifiEvent::StaStarted => {
                    let _ = wifi_tx.send(LinkEvent::StationStarted);
                }
                WifiEvent::StaDisconnected(_) => {
                    let _ = wifi_tx.send(LinkEvent::Disconnected);
                }
                _ => {}
            })
            .map_err(|_| CommsError::WifiInitFailed)?;

        let ip_sub = sysloop
            .subscribe::<IpEvent, _>(move |event| {
                if let IpEvent::DhcpIpAssigned(_) = event {
                    let _ = tx.send(LinkEvent::AddressAcquired);
                }
            })
            .map_err(|_| CommsError::WifiInitFailed)?;

        wifi.start().map_err(|_| CommsError::WifiInitFailed)?;
        info!("wifi: station started, connecting to '{}'", config.ssid);

        let mut machine = BringUp::new(config.max_retries);
        let outcome = loop {
            let event = rx
                .recv()
                .map_err(|_| CommsError::WifiEventChannelClosed)?;
            match machine.handle(event) {
                Step::IssueConnect => {
                    if let Err(e) = wifi.connect() {
                        // The driver raises a disconnect event for a
                        // failed connect, which re-enters the machine.
                        warn!("wifi: connect call failed: {e}");
                    }
                }
                Step::Wait => {}
                Step::Done(outcome) => break outcome,
            }
        };

        drop(wifi_sub);
        drop(ip_sub);

        match outcome {
            Outcome::Connected => {
                if let Ok(ip) = wifi.sta_netif().get_ip_info() {
                    info!("wifi: connected, ip={}", ip.ip);
                }
            }
            Outcome::FailedPermanently => {
                warn!(
                    "wifi: giving up after {} retries",
                    machine.retries()
                );
            }
        }
        Ok(outcome)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
