// ── Client domain types ──

use serde::{Deserialize, Serialize};

use super::value::{Duration, Ip, Mac, Number};

/// A network endpoint known to the controller (wired or wireless).
///
/// Decoded from `stat/sta` (connected clients) and `rest/user`
/// (every client ever seen). Most fields are optional on the wire, so
/// everything defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: String,
    pub mac: Mac,
    pub name: String,
    pub hostname: String,
    #[serde(rename = "dev_name")]
    pub device_name: String,
    pub oui: String,
    pub ip: Ip,
    pub network: String,
    pub essid: String,

    // Upstream placement
    #[serde(rename = "ap_mac")]
    pub access_point_mac: Mac,
    #[serde(rename = "sw_mac")]
    pub switch_mac: Mac,
    #[serde(rename = "gw_mac")]
    pub gateway_mac: Mac,
    pub sw_port: Number,
    pub signal: Number,

    // Traffic: wireless counters
    pub rx_bytes: Number,
    pub tx_bytes: Number,
    #[serde(rename = "rx_bytes-r")]
    pub rx_rate: Number,
    #[serde(rename = "tx_bytes-r")]
    pub tx_rate: Number,

    // Traffic: wired counters
    #[serde(rename = "wired-rx_bytes")]
    pub wired_rx_bytes: Number,
    #[serde(rename = "wired-tx_bytes")]
    pub wired_tx_bytes: Number,
    #[serde(rename = "wired-rx_bytes-r")]
    pub wired_rx_rate: Number,
    #[serde(rename = "wired-tx_bytes-r")]
    pub wired_tx_rate: Number,

    // Lifecycle (Unix seconds)
    pub first_seen: Duration,
    pub last_seen: Duration,
    pub uptime: Number,

    // Flags
    #[serde(rename = "blocked")]
    pub is_blocked: bool,
    pub is_guest: bool,
    pub is_wired: bool,
    #[serde(rename = "authorized")]
    pub is_authorized: bool,

    /// Name of the upstream device, filled in by
    /// [`enrich_upstream`](crate::enrich::enrich_upstream).
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty")]
    pub upstream_name: String,
}

impl Client {
    /// Best label for humans: name, then hostname, then MAC.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.hostname.is_empty() {
            &self.hostname
        } else {
            self.mac.as_str()
        }
    }

    /// MAC of the device this client is associated through:
    /// access point, then switch, then gateway.
    pub fn upstream_mac(&self) -> Option<&Mac> {
        [&self.access_point_mac, &self.switch_mac, &self.gateway_mac]
            .into_iter()
            .find(|mac| !mac.is_empty())
    }

    /// Upstream label: the enriched device name, or its MAC.
    pub fn upstream(&self) -> &str {
        if self.upstream_name.is_empty() {
            self.upstream_mac().map_or("", Mac::as_str)
        } else {
            &self.upstream_name
        }
    }

    pub fn received_bytes(&self) -> i64 {
        if self.is_wired {
            self.wired_rx_bytes.get()
        } else {
            self.rx_bytes.get()
        }
    }

    pub fn sent_bytes(&self) -> i64 {
        if self.is_wired {
            self.wired_tx_bytes.get()
        } else {
            self.tx_bytes.get()
        }
    }

    pub fn receive_rate(&self) -> i64 {
        if self.is_wired {
            self.wired_rx_rate.get()
        } else {
            self.rx_rate.get()
        }
    }

    pub fn send_rate(&self) -> i64 {
        if self.is_wired {
            self.wired_tx_rate.get()
        } else {
            self.tx_rate.get()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_controller_record() {
        let client: Client = serde_json::from_value(json!({
            "_id": "5f1",
            "mac": "AA:BB:CC:00:00:01",
            "hostname": "laptop",
            "ip": "10.0.0.5",
            "ap_mac": "f0:9f:c2:00:00:01",
            "rx_bytes": "1200",
            "tx_bytes": 3400,
            "rx_bytes-r": 12.5,
            "wired-rx_bytes": 99,
            "last_seen": 1_718_447_400,
            "uptime": "3600",
            "blocked": true,
            "authorized": true,
            "unknown_field": [1, 2, 3]
        }))
        .unwrap();

        assert_eq!(client.id, "5f1");
        assert_eq!(client.mac.as_str(), "aa:bb:cc:00:00:01");
        assert_eq!(client.display_name(), "laptop");
        assert_eq!(client.ip.as_str(), Some("10.0.0.5"));
        assert_eq!(client.received_bytes(), 1200);
        assert_eq!(client.sent_bytes(), 3400);
        assert_eq!(client.receive_rate(), 12);
        assert_eq!(client.uptime.get(), 3600);
        assert!(client.is_blocked && client.is_authorized && !client.is_wired);
        assert_eq!(client.upstream(), "f0:9f:c2:00:00:01");
    }

    #[test]
    fn wired_clients_use_wired_counters() {
        let client: Client = serde_json::from_value(json!({
            "mac": "aa:bb:cc:00:00:02",
            "is_wired": true,
            "rx_bytes": 1,
            "wired-rx_bytes": 500,
            "wired-tx_bytes-r": 42,
            "sw_mac": "74:ac:b9:00:00:01"
        }))
        .unwrap();

        assert_eq!(client.received_bytes(), 500);
        assert_eq!(client.send_rate(), 42);
        assert_eq!(
            client.upstream_mac().map(Mac::as_str),
            Some("74:ac:b9:00:00:01")
        );
        assert_eq!(client.display_name(), "aa:bb:cc:00:00:02");
    }

    #[test]
    fn upstream_name_is_not_read_from_the_wire() {
        let client: Client =
            serde_json::from_value(json!({ "upstream_name": "spoofed" })).unwrap();
        assert!(client.upstream_name.is_empty());
        assert!(client.upstream_mac().is_none());
        assert_eq!(client.upstream(), "");
    }
}
