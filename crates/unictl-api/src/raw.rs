// Raw endpoint passthrough
//
// Lets callers reach controller paths this crate does not model while
// keeping the same login, CSRF, and error rules as the typed endpoints.

use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::session::Session;

impl Session {
    /// GET an arbitrary path.
    ///
    /// Paths starting with `/` are taken relative to the endpoint; anything
    /// else is site-scoped (`stat/health` becomes
    /// `/proxy/network/api/s/{site}/stat/health`).
    pub async fn get_raw(&mut self, path: &str) -> Result<String, Error> {
        self.login().await?;
        let url = self.raw_url(path)?;
        debug!(path, "raw GET");
        self.send(Method::GET, url, None::<&()>).await
    }

    /// POST a JSON body to an arbitrary path, resolved like [`Session::get_raw`].
    pub async fn post_raw(&mut self, path: &str, body: &serde_json::Value) -> Result<String, Error> {
        self.login().await?;
        let url = self.raw_url(path)?;
        debug!(path, "raw POST");
        self.send(Method::POST, url, Some(body)).await
    }

    fn raw_url(&mut self, path: &str) -> Result<Url, Error> {
        if path.starts_with('/') {
            self.endpoint_url(path)
        } else {
            self.site_url(path)
        }
    }
}
