// ── Event domain types ──

use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::value::{Mac, Timestamp};

macro_rules! event_types {
    ($($variant:ident => $key:literal, $label:literal;)+) => {
        /// Controller event key (`EVT_*`), parsed case-sensitively.
        ///
        /// Keys outside the known set are kept verbatim in [`EventType::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
        pub enum EventType {
            $(
                #[strum(serialize = $key)]
                $variant,
            )+
            #[strum(default)]
            Other(String),
        }

        impl EventType {
            /// The wire key, e.g. `EVT_WU_Connected`.
            pub fn key(&self) -> &str {
                match self {
                    $(Self::$variant => $key,)+
                    Self::Other(key) => key,
                }
            }

            /// Short human label, e.g. `wireless-user-connected`.
            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(key) => key,
                }
            }
        }
    };
}

event_types! {
    WirelessUserConnected => "EVT_WU_Connected", "wireless-user-connected";
    WirelessUserDisconnected => "EVT_WU_Disconnected", "wireless-user-disconnected";
    WirelessUserRoam => "EVT_WU_Roam", "wireless-user-roam";
    WirelessUserRoamRadio => "EVT_WU_RoamRadio", "wireless-user-roam-radio";
    WirelessGuestConnected => "EVT_WG_Connected", "wireless-guest-connected";
    WirelessGuestDisconnected => "EVT_WG_Disconnected", "wireless-guest-disconnected";
    WirelessGuestRoam => "EVT_WG_Roam", "wireless-guest-roam";
    WirelessGuestRoamRadio => "EVT_WG_RoamRadio", "wireless-guest-roam-radio";
    WirelessGuestAuthorizationEnded => "EVT_WG_AuthorizationEnded", "wireless-guest-authorization-ended";
    LanUserConnected => "EVT_LU_Connected", "lan-user-connected";
    LanUserDisconnected => "EVT_LU_Disconnected", "lan-user-disconnected";
    LanGuestConnected => "EVT_LG_Connected", "lan-guest-connected";
    LanGuestDisconnected => "EVT_LG_Disconnected", "lan-guest-disconnected";
    ApAdopted => "EVT_AP_Adopted", "ap-adopted";
    ApConnected => "EVT_AP_Connected", "ap-connected";
    ApLostContact => "EVT_AP_Lost_Contact", "ap-lost-contact";
    ApRestarted => "EVT_AP_Restarted", "ap-restarted";
    ApRestartedUnknown => "EVT_AP_RestartedUnknown", "ap-restarted-unknown";
    ApUpgraded => "EVT_AP_Upgraded", "ap-upgraded";
    ApIsolated => "EVT_AP_Isolated", "ap-isolated";
    ApAutoReadopted => "EVT_AP_AutoReadopted", "ap-auto-readopted";
    ApChannelChanged => "EVT_AP_ChannelChanged", "ap-channel-changed";
    ApDetectRogueAp => "EVT_AP_DetectRogueAP", "ap-detect-rogue-ap";
    ApPossibleInterference => "EVT_AP_PossibleInterference", "ap-possible-interference";
    SwitchAdopted => "EVT_SW_Adopted", "switch-adopted";
    SwitchConnected => "EVT_SW_Connected", "switch-connected";
    SwitchDisconnected => "EVT_SW_Disconnected", "switch-disconnected";
    SwitchLostContact => "EVT_SW_Lost_Contact", "switch-lost-contact";
    SwitchRestarted => "EVT_SW_Restarted", "switch-restarted";
    SwitchRestartedUnknown => "EVT_SW_RestartedUnknown", "switch-restarted-unknown";
    SwitchUpgraded => "EVT_SW_Upgraded", "switch-upgraded";
    SwitchAutoReadopted => "EVT_SW_AutoReadopted", "switch-auto-readopted";
    SwitchPoeOverload => "EVT_SW_PoeOverload", "switch-poe-overload";
    SwitchStpPortBlocking => "EVT_SW_StpPortBlocking", "switch-stp-port-blocking";
    GatewayAdopted => "EVT_GW_Adopted", "gateway-adopted";
    GatewayLostContact => "EVT_GW_Lost_Contact", "gateway-lost-contact";
    GatewayRestarted => "EVT_GW_Restarted", "gateway-restarted";
    GatewayUpgraded => "EVT_GW_Upgraded", "gateway-upgraded";
    GatewayWanTransition => "EVT_GW_WANTransition", "gateway-wan-transition";
    AdminLogin => "EVT_AD_Login", "admin-login";
    IpsAlert => "EVT_IPS_IpsAlert", "ips-alert";
}

impl Default for EventType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for EventType {
    fn from(key: String) -> Self {
        key.parse().unwrap_or(Self::Other(key))
    }
}

impl Serialize for EventType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = Option::<String>::deserialize(deserializer)?;
        Ok(key.map(Self::from).unwrap_or_default())
    }
}

/// One entry from the controller event log (`stat/event`, `rest/event`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "key")]
    pub event_type: EventType,

    // Who
    pub user: Mac,
    pub client: Mac,
    pub guest: Mac,

    // Where
    pub ap: Mac,
    pub sw: Mac,
    pub gw: Mac,
    pub ap_from: Mac,
    pub ap_to: Mac,

    /// Milliseconds since the Unix epoch.
    pub time: Timestamp,
    pub msg: String,
    pub ssid: String,
    pub hostname: String,
    pub subsystem: String,
}

impl Event {
    /// The station the event is about: user, then client, then guest.
    pub fn who(&self) -> Option<&Mac> {
        [&self.user, &self.client, &self.guest]
            .into_iter()
            .find(|mac| !mac.is_empty())
    }

    /// The infrastructure involved: AP, switch, gateway, then the roam
    /// destination and origin.
    pub fn where_(&self) -> Option<&Mac> {
        [&self.ap, &self.sw, &self.gw, &self.ap_to, &self.ap_from]
            .into_iter()
            .find(|mac| !mac.is_empty())
    }
}
