// Authenticated controller session
//
// Wraps `reqwest::Client` with the controller's cookie + CSRF session
// model, site-scoped URL construction, and error accumulation. Endpoint
// groups (clients, devices, events, raw) are inherent methods in
// separate files; this module owns the request mechanics.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{Cause, Error, record};
use crate::transport::{DEFAULT_TIMEOUT, TransportConfig};

/// Request and response header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Response header some controller builds use when rotating the token.
const UPDATED_CSRF_HEADER: &str = "x-updated-csrf-token";

/// Prefix of every site-scoped network application path.
const NETWORK_PREFIX: &str = "/proxy/network/api/s";

/// A destination for command output.
pub type Stream = Box<dyn Write + Send>;

/// Everything needed to open a session against one controller site.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Controller root, e.g. `https://192.168.1.1`.
    pub endpoint: String,
    pub username: String,
    pub password: SecretString,
    /// Site name; empty means `default`.
    pub site: String,
    pub timeout: Duration,
    /// Accept self-signed controller certificates.
    pub accept_invalid_certs: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: String::new(),
            password: SecretString::from(String::new()),
            site: "default".into(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: true,
        }
    }
}

#[derive(Debug)]
enum Auth {
    Anonymous,
    /// Login succeeded; holds the login response body.
    Authenticated(String),
}

/// An authenticated HTTP session against a controller.
///
/// Logs in lazily on the first call that needs it and at most once per
/// instance. Every failure is folded into one accumulated [`Error`]; once
/// an error is held, every further operation returns it without touching
/// the network. A session is meant for sequential use (`&mut self`);
/// parallel queries need separate sessions.
pub struct Session {
    http: Option<reqwest::Client>,
    base_url: Option<Url>,
    endpoint: String,
    username: String,
    password: SecretString,
    site: String,
    timeout: Duration,
    auth: Auth,
    csrf_token: Option<String>,
    cookie_jar: Arc<Jar>,
    stdout: Stream,
    stderr: Stream,
    error: Option<Error>,
}

impl Session {
    /// Validate `config` and prepare the transport.
    ///
    /// Accepts up to two streams (stdout, then stderr); missing ones default
    /// to the process streams. Validation problems do not abort: they are all
    /// recorded and the session is returned in its failed state, see
    /// [`Session::error`].
    pub fn initialize(config: SessionConfig, streams: Vec<Stream>) -> Self {
        let mut error = None;

        let endpoint = config.endpoint.trim().trim_end_matches('/').to_owned();
        if endpoint.is_empty() {
            record(&mut error, Cause::Missing("endpoint"));
        }
        if config.username.is_empty() {
            record(&mut error, Cause::Missing("username"));
        }
        if config.password.expose_secret().is_empty() {
            record(&mut error, Cause::Missing("password"));
        }

        let base_url = if endpoint.is_empty() {
            None
        } else {
            match Url::parse(&endpoint) {
                Ok(url) => Some(url),
                Err(e) => {
                    record(
                        &mut error,
                        Cause::InvalidEndpoint {
                            endpoint: endpoint.clone(),
                            reason: e.to_string(),
                        },
                    );
                    None
                }
            }
        };

        let count = streams.len();
        if count > 2 {
            record(&mut error, Cause::TooManyStreams(count));
        }
        let mut streams = streams.into_iter();
        let stdout = streams
            .next()
            .unwrap_or_else(|| Box::new(io::stdout()) as Stream);
        let stderr = streams
            .next()
            .unwrap_or_else(|| Box::new(io::stderr()) as Stream);

        let transport = TransportConfig {
            timeout: config.timeout,
            accept_invalid_certs: config.accept_invalid_certs,
            ..TransportConfig::default()
        };
        let cookie_jar = Arc::clone(&transport.cookie_jar);

        let http = if error.is_none() {
            match transport.build_client(&endpoint) {
                Ok(client) => Some(client),
                Err(cause) => {
                    record(&mut error, cause);
                    None
                }
            }
        } else {
            None
        };

        if let Some(ref err) = error {
            warn!(error = %err, "session initialization failed");
        } else {
            debug!(endpoint = %endpoint, site = %config.site, "session ready");
        }

        let site = if config.site.is_empty() {
            "default".to_owned()
        } else {
            config.site
        };

        Self {
            http,
            base_url,
            endpoint,
            username: config.username,
            password: config.password,
            site,
            timeout: config.timeout,
            auth: Auth::Anonymous,
            csrf_token: None,
            cookie_jar,
            stdout,
            stderr,
            error,
        }
    }

    // ── State ────────────────────────────────────────────────────────

    /// The accumulated error, if any operation has failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// `true` until the first error is recorded.
    pub fn is_ready(&self) -> bool {
        self.error.is_none()
    }

    /// `true` once a login has succeeded.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth, Auth::Authenticated(_))
    }

    /// The controller endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The site every scoped path is built against.
    pub fn site(&self) -> &str {
        &self.site
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// The current CSRF token, as last issued by the controller.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// The `Cookie` header value the jar would send to the controller.
    pub fn cookie_header(&self) -> Option<String> {
        let url = self.base_url.as_ref()?;
        let cookies = self.cookie_jar.cookies(url)?;
        cookies.to_str().ok().map(String::from)
    }

    /// Destination for regular command output.
    pub fn stdout(&mut self) -> &mut dyn Write {
        self.stdout.as_mut()
    }

    /// Destination for diagnostics.
    pub fn stderr(&mut self) -> &mut dyn Write {
        self.stderr.as_mut()
    }

    pub(crate) fn mark_authenticated(&mut self, login: String) {
        self.auth = Auth::Authenticated(login);
    }

    pub(crate) fn cached_login(&self) -> Option<&str> {
        match &self.auth {
            Auth::Authenticated(body) => Some(body),
            Auth::Anonymous => None,
        }
    }

    /// Return the held error, if any, without recording anything new.
    pub(crate) fn check(&self) -> Result<(), Error> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn fail(&mut self, cause: Cause) -> Error {
        let err = record(&mut self.error, cause);
        debug!(error = %err, "session error recorded");
        err
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{endpoint}{path}` for controller-level paths such as the login.
    pub(crate) fn endpoint_url(&mut self, path: &str) -> Result<Url, Error> {
        let full = format!("{}{path}", self.endpoint);
        Url::parse(&full).map_err(|e| {
            self.fail(Cause::Request {
                method: "-".into(),
                url: full,
                message: format!("invalid URL: {e}"),
            })
        })
    }

    /// `{endpoint}/proxy/network/api/s/{site}/{path}`
    pub(crate) fn site_url(&mut self, path: &str) -> Result<Url, Error> {
        let path = format!("{NETWORK_PREFIX}/{}/{}", self.site, path.trim_start_matches('/'));
        self.endpoint_url(&path)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a site-scoped path, logging in first if needed.
    pub(crate) async fn get_site(&mut self, path: &str) -> Result<String, Error> {
        self.login().await?;
        let url = self.site_url(path)?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// POST a JSON body to a site-scoped path, logging in first if needed.
    pub(crate) async fn post_site(
        &mut self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<String, Error> {
        self.login().await?;
        let url = self.site_url(path)?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// Send one request and return the body.
    ///
    /// Transport failures yield no body. Statuses outside `[200, 400)` are
    /// recorded with the body kept on the error for diagnostics.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &mut self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<String, Error> {
        self.check()?;
        let Some(http) = self.http.clone() else {
            return Err(self.fail(Cause::Transport("transport not initialized".into())));
        };

        debug!("{} {}", method, url);

        let mut builder = http.request(method.clone(), url.clone());
        if let Some(ref token) = self.csrf_token {
            builder = builder.header(CSRF_HEADER, token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                return Err(self.fail(Cause::Timeout {
                    method: method.to_string(),
                    url: url.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }));
            }
            Err(e) => {
                return Err(self.fail(Cause::Request {
                    method: method.to_string(),
                    url: url.to_string(),
                    message: e.to_string(),
                }));
            }
        };

        self.update_csrf_from_response(resp.headers());
        let status = resp.status();

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                return Err(self.fail(Cause::Request {
                    method: method.to_string(),
                    url: url.to_string(),
                    message: format!("reading body: {e}"),
                }));
            }
        };

        if !(200..400).contains(&status.as_u16()) {
            return Err(self.fail(Cause::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.to_string(),
                code: status.as_u16(),
                body: text,
            }));
        }

        trace!(bytes = text.len(), "response received");
        Ok(text)
    }

    // ── CSRF token management ─────────────────────────────────────────

    /// Adopt a token issued by the controller. Tokens rotate per response,
    /// so any newer value replaces the cached one.
    fn update_csrf_from_response(&mut self, headers: &HeaderMap) {
        let token = headers
            .get(UPDATED_CSRF_HEADER)
            .or_else(|| headers.get(CSRF_HEADER))
            .and_then(|v| v.to_str().ok());

        if let Some(token) = token {
            if self.csrf_token.as_deref() != Some(token) {
                trace!("CSRF token rotated");
                self.csrf_token = Some(token.to_owned());
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("site", &self.site)
            .field("authenticated", &self.is_authenticated())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            endpoint: "https://ctrl.example/".into(),
            username: "admin".into(),
            password: SecretString::from("hunter2".to_owned()),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn initialize_trims_endpoint_and_is_ready() {
        let session = Session::initialize(config(), Vec::new());
        assert!(session.is_ready());
        assert!(!session.is_authenticated());
        assert_eq!(session.endpoint(), "https://ctrl.example");
        assert_eq!(session.site(), "default");
    }

    #[test]
    fn missing_credentials_are_reported_together() {
        let session = Session::initialize(
            SessionConfig {
                username: String::new(),
                password: SecretString::from(String::new()),
                ..config()
            },
            Vec::new(),
        );
        let err = session.error().unwrap().to_string();
        assert!(err.contains("missing username"), "{err}");
        assert!(err.contains("missing password"), "{err}");
        assert!(session.error().unwrap().is_configuration());
    }

    #[test]
    fn more_than_two_streams_is_a_configuration_error() {
        let streams: Vec<Stream> = vec![
            Box::new(Vec::<u8>::new()),
            Box::new(Vec::<u8>::new()),
            Box::new(Vec::<u8>::new()),
        ];
        let session = Session::initialize(config(), streams);
        let err = session.error().unwrap();
        assert_eq!(err.latest(), &Cause::TooManyStreams(3));
    }

    /// In-memory stream that stays readable after being boxed.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn two_streams_become_stdout_and_stderr() {
        let out = SharedBuf::default();
        let err = SharedBuf::default();
        let streams: Vec<Stream> = vec![Box::new(out.clone()), Box::new(err.clone())];
        let mut session = Session::initialize(config(), streams);
        assert!(session.is_ready());

        writeln!(session.stdout(), "listing").unwrap();
        writeln!(session.stderr(), "warning").unwrap();

        assert_eq!(out.contents(), "listing\n");
        assert_eq!(err.contents(), "warning\n");
    }

    #[test]
    fn one_stream_is_stdout_and_stderr_defaults() {
        let out = SharedBuf::default();
        let streams: Vec<Stream> = vec![Box::new(out.clone())];
        let mut session = Session::initialize(config(), streams);
        assert!(session.is_ready());

        writeln!(session.stdout(), "listing").unwrap();
        session.stderr().flush().unwrap();

        assert_eq!(out.contents(), "listing\n");
    }

    #[test]
    fn unparseable_endpoint_is_rejected() {
        let session = Session::initialize(
            SessionConfig {
                endpoint: "ctrl.example".into(),
                ..config()
            },
            Vec::new(),
        );
        assert!(matches!(
            session.error().unwrap().latest(),
            Cause::InvalidEndpoint { .. }
        ));
    }

    #[test]
    fn site_url_is_scoped_under_network_proxy() {
        let mut session = Session::initialize(
            SessionConfig {
                site: "branch".into(),
                ..config()
            },
            Vec::new(),
        );
        let url = session.site_url("stat/sta").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ctrl.example/proxy/network/api/s/branch/stat/sta"
        );
    }

    #[test]
    fn csrf_token_prefers_rotated_header() {
        let mut session = Session::initialize(config(), Vec::new());
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER, "old".parse().unwrap());
        headers.insert(UPDATED_CSRF_HEADER, "new".parse().unwrap());
        session.update_csrf_from_response(&headers);
        assert_eq!(session.csrf_token(), Some("new"));
    }
}
