// Session authentication
//
// Cookie-based login against the UniFi OS auth endpoint. The response
// sets the session cookie in the jar and issues the first CSRF token;
// both are reused by every later request on the same session.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::session::Session;

/// Controller-level authentication endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login";

impl Session {
    /// Authenticate with the session's credentials.
    ///
    /// `POST /api/auth/login` with
    /// `{"username", "password", "strict": "true", "remember": "true"}`.
    ///
    /// Runs at most once per session: after the first success the cached
    /// login body is returned without contacting the controller again.
    /// A failed session returns its accumulated error immediately.
    pub async fn login(&mut self) -> Result<String, Error> {
        self.check()?;
        if let Some(body) = self.cached_login() {
            return Ok(body.to_owned());
        }

        let url = self.endpoint_url(LOGIN_PATH)?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.username(),
            "password": self.password().expose_secret(),
            "strict": "true",
            "remember": "true",
        });

        let login = self.send(Method::POST, url, Some(&body)).await?;
        self.mark_authenticated(login.clone());

        debug!("login successful");
        Ok(login)
    }
}
