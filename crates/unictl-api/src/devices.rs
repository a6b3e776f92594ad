// Device endpoints

use tracing::debug;

use crate::error::Error;
use crate::session::Session;

impl Session {
    /// List every managed device (access points, switches, gateways).
    ///
    /// `GET /proxy/network/api/s/{site}/stat/device`
    pub async fn list_devices(&mut self) -> Result<String, Error> {
        debug!("listing devices");
        self.get_site("stat/device").await
    }
}
