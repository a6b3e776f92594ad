// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use super::value::{Duration, Ip, Mac, Number};

/// Device role inferred from the controller's `type` and `model` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    Gateway,
    Switch,
    AccessPoint,
    Other,
}

/// Device operational state, from the controller's integer `state` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DeviceState {
    Offline,
    Online,
    PendingAdoption,
    Updating,
    Provisioning,
    HeartbeatMissed,
    Adopting,
    Isolated,
    Unknown,
}

impl DeviceState {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Offline,
            1 => Self::Online,
            2 => Self::PendingAdoption,
            4 => Self::Updating,
            5 => Self::Provisioning,
            6 => Self::HeartbeatMissed,
            7 => Self::Adopting,
            11 => Self::Isolated,
            _ => Self::Unknown,
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// A controller-managed infrastructure node (access point, switch, gateway).
///
/// Decoded from `stat/device`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    #[serde(rename = "_id")]
    pub id: String,
    pub mac: Mac,
    pub name: String,
    pub ip: Ip,
    pub model: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub version: String,
    pub serial: String,
    pub state: Number,
    pub adopted: bool,
    #[serde(rename = "upgradable")]
    pub is_upgradable: bool,
    #[serde(rename = "disabled")]
    pub is_disabled: bool,
    pub uptime: Number,
    pub last_seen: Duration,
    pub num_sta: Number,
    pub rx_bytes: Number,
    pub tx_bytes: Number,
}

impl Device {
    /// Name, or MAC for unnamed devices.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.mac.as_str()
        } else {
            &self.name
        }
    }

    pub fn status(&self) -> DeviceState {
        DeviceState::from_code(self.state.get())
    }

    /// The `type` field is usually `uap`, `usw`, `ugw`, `udm` or `uxg`;
    /// newer hardware is recognized by model prefix.
    pub fn kind(&self) -> DeviceKind {
        match self.device_type.as_str() {
            "uap" => DeviceKind::AccessPoint,
            "usw" => DeviceKind::Switch,
            "ugw" | "udm" | "uxg" => DeviceKind::Gateway,
            _ => {
                let model = self.model.to_uppercase();
                if ["UAP", "U6", "U7"].iter().any(|p| model.starts_with(p)) {
                    DeviceKind::AccessPoint
                } else if ["USW", "USL"].iter().any(|p| model.starts_with(p)) {
                    DeviceKind::Switch
                } else if ["UGW", "UDM", "UDR", "UXG", "UCG"]
                    .iter()
                    .any(|p| model.starts_with(p))
                {
                    DeviceKind::Gateway
                } else {
                    DeviceKind::Other
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_from_type_or_model() {
        let ap = Device {
            device_type: "uap".into(),
            ..Device::default()
        };
        assert_eq!(ap.kind(), DeviceKind::AccessPoint);

        let udr = Device {
            model: "UDR".into(),
            ..Device::default()
        };
        assert_eq!(udr.kind(), DeviceKind::Gateway);

        let lite = Device {
            model: "USL16LP".into(),
            ..Device::default()
        };
        assert_eq!(lite.kind(), DeviceKind::Switch);
        assert_eq!(Device::default().kind(), DeviceKind::Other);
    }

    #[test]
    fn state_codes() {
        assert_eq!(DeviceState::from_code(0), DeviceState::Offline);
        assert_eq!(DeviceState::from_code(1), DeviceState::Online);
        assert_eq!(DeviceState::from_code(2), DeviceState::PendingAdoption);
        assert_eq!(DeviceState::from_code(4), DeviceState::Updating);
        assert_eq!(DeviceState::from_code(99), DeviceState::Unknown);
        assert_eq!(DeviceState::PendingAdoption.to_string(), "pending-adoption");
    }

    #[test]
    fn decodes_stat_device_record() {
        let device: Device = serde_json::from_value(json!({
            "_id": "d1",
            "mac": "F0:9F:C2:00:00:01",
            "ip": "192.168.1.2",
            "model": "U6LR",
            "type": "uap",
            "state": 1,
            "num_sta": "12",
            "upgradable": true,
            "port_table": [{ "port_idx": 1 }]
        }))
        .unwrap();

        assert_eq!(device.display_name(), "f0:9f:c2:00:00:01");
        assert!(device.status().is_online());
        assert_eq!(device.num_sta.get(), 12);
        assert!(device.is_upgradable);
    }
}
