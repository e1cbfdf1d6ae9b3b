//! Device action requests
//!
//! A request is built either directly by a caller or from the flat
//! key/value record a home-screen widget stores for its device:
//! ```text
//! {"actionType": 0, "ip": "192.168.1.50", "mac": "AA:BB:CC:DD:EE:FF", "key": "", "port_wol": 9}
//! ```

use crate::{timing, ActionError};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The two power actions a device supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Wake,
    Shutdown,
}

impl TryFrom<i64> for ActionKind {
    type Error = ActionError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ActionKind::Wake),
            1 => Ok(ActionKind::Shutdown),
            other => Err(ActionError::UnknownAction(other)),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Wake => write!(f, "Wake"),
            ActionKind::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// A 48-bit hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl FromStr for MacAddress {
    type Err = ActionError;

    /// Accepts six two-digit hex octets separated by `:` or `-`, in any mix
    /// and any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(|c: char| c == ':' || c == '-').collect();
        if tokens.len() != 6 {
            return Err(ActionError::InvalidMacFormat);
        }

        let mut bytes = [0u8; 6];
        for (byte, token) in bytes.iter_mut().zip(&tokens) {
            hex::decode_to_slice(token, std::slice::from_mut(byte))
                .map_err(|_| ActionError::InvalidMacFormat)?;
        }

        Ok(Self(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// One power action for one device.
///
/// Fields are kept as the caller supplied them; validation is part of the
/// execution so that bad input ends in a rejected outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceActionRequest {
    pub kind: ActionKind,
    pub host_address: String,
    pub mac_address: String,
    pub shared_key: String,
    pub wake_port: u16,
}

impl DeviceActionRequest {
    /// Create a wake request
    pub fn wake(
        host_address: impl Into<String>,
        mac_address: impl Into<String>,
        wake_port: u16,
    ) -> Self {
        Self {
            kind: ActionKind::Wake,
            host_address: host_address.into(),
            mac_address: mac_address.into(),
            shared_key: String::new(),
            wake_port,
        }
    }

    /// Create a shutdown request
    pub fn shutdown(host_address: impl Into<String>, shared_key: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Shutdown,
            host_address: host_address.into(),
            mac_address: String::new(),
            shared_key: shared_key.into(),
            wake_port: timing::DEFAULT_WAKE_PORT,
        }
    }
}

fn unknown_action() -> i64 {
    -1
}

fn default_wake_port() -> u16 {
    timing::DEFAULT_WAKE_PORT
}

/// The configuration record a widget hands over when it is tapped
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTrigger {
    #[serde(default = "unknown_action")]
    pub action_type: i64,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub key: String,
    #[serde(rename = "port_wol", default = "default_wake_port")]
    pub port_wol: u16,
    #[serde(default)]
    pub device_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub action_label: Option<String>,
}

impl WidgetTrigger {
    /// Parse the JSON record stored for a widget
    pub fn from_json(raw: &str) -> Result<Self, ActionError> {
        serde_json::from_str(raw).map_err(|e| ActionError::MalformedTrigger(e.to_string()))
    }

    /// Turn the record into a request, rejecting unknown action codes
    pub fn into_request(self) -> Result<DeviceActionRequest, ActionError> {
        let kind = ActionKind::try_from(self.action_type)?;

        Ok(DeviceActionRequest {
            kind,
            host_address: self.ip,
            mac_address: self.mac,
            shared_key: self.key,
            wake_port: self.port_wol,
        })
    }
}
