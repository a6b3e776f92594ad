// Event endpoints
//
// stat/event returns the recent window the controller keeps hot;
// rest/event walks the whole stored history.

use tracing::debug;

use crate::error::Error;
use crate::session::Session;

impl Session {
    /// List recent events.
    ///
    /// `GET /proxy/network/api/s/{site}/stat/event`
    pub async fn list_events(&mut self) -> Result<String, Error> {
        debug!("listing recent events");
        self.get_site("stat/event").await
    }

    /// List every stored event.
    ///
    /// `GET /proxy/network/api/s/{site}/rest/event`
    pub async fn list_all_events(&mut self) -> Result<String, Error> {
        debug!("listing all events");
        self.get_site("rest/event").await
    }
}
