// Client (station) endpoints
//
// Listing via stat/sta (connected) and rest/user (every known client),
// station commands via cmd/stamgr.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::session::Session;

/// Station-manager command accepted by `cmd/stamgr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationCommand {
    Kick,
    Block,
    Unblock,
}

impl StationCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kick => "kick-sta",
            Self::Block => "block-sta",
            Self::Unblock => "unblock-sta",
        }
    }
}

impl Session {
    /// List currently connected clients.
    ///
    /// `GET /proxy/network/api/s/{site}/stat/sta`
    pub async fn list_clients(&mut self) -> Result<String, Error> {
        debug!("listing connected clients");
        self.get_site("stat/sta").await
    }

    /// List every client the controller has ever seen.
    ///
    /// `GET /proxy/network/api/s/{site}/rest/user`
    pub async fn list_users(&mut self) -> Result<String, Error> {
        debug!("listing known users");
        self.get_site("rest/user").await
    }

    /// Disconnect a client; it may reconnect immediately.
    pub async fn kick(&mut self, mac: &str) -> Result<String, Error> {
        self.station_command(StationCommand::Kick, mac).await
    }

    /// Block a client from the network.
    pub async fn block(&mut self, mac: &str) -> Result<String, Error> {
        self.station_command(StationCommand::Block, mac).await
    }

    /// Lift a previous block.
    pub async fn unblock(&mut self, mac: &str) -> Result<String, Error> {
        self.station_command(StationCommand::Unblock, mac).await
    }

    /// `POST /proxy/network/api/s/{site}/cmd/stamgr` with `{"cmd": ..., "mac": ...}`
    pub async fn station_command(
        &mut self,
        command: StationCommand,
        mac: &str,
    ) -> Result<String, Error> {
        debug!(mac, cmd = command.as_str(), "station command");
        self.post_site(
            "cmd/stamgr",
            &json!({
                "cmd": command.as_str(),
                "mac": mac,
            }),
        )
        .await
    }
}
