// ── Post-fetch enrichment ──
//
// Clients only carry the MAC of their upstream device. Cross-reference
// the device listing so tables can show a readable name instead.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{Client, Device, Mac};

/// Fill `Client::upstream_name` from the device whose MAC matches the
/// client's upstream. Unnamed devices contribute their MAC.
pub fn enrich_upstream(clients: &mut [Client], devices: &[Device]) {
    let by_mac: HashMap<&Mac, &Device> = devices.iter().map(|d| (&d.mac, d)).collect();

    let mut resolved = 0_usize;
    for client in clients.iter_mut() {
        let Some(device) = client.upstream_mac().and_then(|mac| by_mac.get(mac)) else {
            continue;
        };
        client.upstream_name = device.display_name().to_owned();
        resolved += 1;
    }
    debug!(resolved, clients = clients.len(), "enriched upstream names");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(mac: &str, name: &str) -> Device {
        Device {
            mac: Mac::new(mac),
            name: name.into(),
            ..Device::default()
        }
    }

    #[test]
    fn names_come_from_matching_devices() {
        let mut clients = vec![
            Client {
                access_point_mac: Mac::new("F0:9F:C2:00:00:01"),
                ..Client::default()
            },
            Client {
                switch_mac: Mac::new("74:ac:b9:00:00:02"),
                ..Client::default()
            },
            Client {
                gateway_mac: Mac::new("00:00:00:00:00:99"),
                ..Client::default()
            },
        ];
        let devices = [
            device("f0:9f:c2:00:00:01", "office-ap"),
            device("74:ac:b9:00:00:02", ""),
        ];

        enrich_upstream(&mut clients, &devices);

        assert_eq!(clients[0].upstream_name, "office-ap");
        assert_eq!(clients[1].upstream_name, "74:ac:b9:00:00:02");
        assert!(clients[2].upstream_name.is_empty());
        assert_eq!(clients[2].upstream(), "00:00:00:00:00:99");
    }
}
