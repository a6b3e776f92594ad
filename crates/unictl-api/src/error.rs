use std::fmt;

use thiserror::Error;

/// A single failure recorded by a [`Session`](crate::Session).
///
/// Causes are grouped the way callers react to them: configuration
/// problems never reach the network, transport problems abort the call
/// with no body, and status problems still carry the controller's body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Cause {
    // ── Configuration ───────────────────────────────────────────────
    /// A required session field was empty.
    #[error("missing {0}")]
    Missing(&'static str),

    /// The endpoint could not be parsed as an absolute URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// More than the two supported output streams were supplied.
    #[error("too many output streams: expected at most 2, got {0}")]
    TooManyStreams(usize),

    // ── Transport ───────────────────────────────────────────────────
    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP transport: {0}")]
    Transport(String),

    /// Building or sending a request failed before a response arrived.
    #[error("{method} {url}: {message}")]
    Request {
        method: String,
        url: String,
        message: String,
    },

    /// The request did not complete within the session timeout.
    #[error("{method} {url}: timed out after {timeout_secs}s")]
    Timeout {
        method: String,
        url: String,
        timeout_secs: u64,
    },

    // ── Protocol ────────────────────────────────────────────────────
    /// The controller answered with a status outside `[200, 400)`.
    #[error("{method} {url}: {status}")]
    Status {
        method: String,
        url: String,
        status: String,
        code: u16,
        body: String,
    },
}

impl Cause {
    /// Returns `true` for failures detected before any network I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Missing(_) | Self::InvalidEndpoint { .. } | Self::TooManyStreams(_)
        )
    }
}

/// The accumulated error of a session.
///
/// Holds every recorded [`Cause`], most recent first. The rendered message
/// reads `newest: ...: oldest`, so the latest failure leads and the earlier
/// context follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    causes: Vec<Cause>,
}

impl Error {
    pub fn new(cause: Cause) -> Self {
        Self {
            causes: vec![cause],
        }
    }

    /// Put `cause` in front of the causes accumulated so far.
    pub fn prepend(mut self, cause: Cause) -> Self {
        self.causes.insert(0, cause);
        self
    }

    /// All causes, most recent first.
    pub fn causes(&self) -> &[Cause] {
        &self.causes
    }

    /// The most recently recorded cause.
    pub fn latest(&self) -> &Cause {
        // `causes` is never empty: both constructors push one.
        &self.causes[0]
    }

    /// The response body of the latest HTTP status failure, if any.
    pub fn body(&self) -> Option<&str> {
        self.causes.iter().find_map(|c| match c {
            Cause::Status { body, .. } => Some(body.as_str()),
            _ => None,
        })
    }

    /// The HTTP status code of the latest status failure, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.causes.iter().find_map(|c| match c {
            Cause::Status { code, .. } => Some(*code),
            _ => None,
        })
    }

    /// Returns `true` when every cause was found before touching the network.
    pub fn is_configuration(&self) -> bool {
        self.causes.iter().all(Cause::is_configuration)
    }

    /// Returns `true` if any cause is a request timeout.
    pub fn is_timeout(&self) -> bool {
        self.causes.iter().any(|c| matches!(c, Cause::Timeout { .. }))
    }
}

impl From<Cause> for Error {
    fn from(cause: Cause) -> Self {
        Self::new(cause)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cause) in self.causes.iter().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// Fold `cause` into the error held in `slot` and return the result.
pub(crate) fn record(slot: &mut Option<Error>, cause: Cause) -> Error {
    let err = match slot.take() {
        Some(err) => err.prepend(cause),
        None => Error::new(cause),
    };
    *slot = Some(err.clone());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_cause_renders_first() {
        let mut slot = None;
        record(&mut slot, Cause::Missing("username"));
        let err = record(&mut slot, Cause::Missing("password"));
        assert_eq!(err.to_string(), "missing password: missing username");
        assert_eq!(err.latest(), &Cause::Missing("password"));
        assert_eq!(slot, Some(err));
    }

    #[test]
    fn configuration_only_when_every_cause_is() {
        let err = Error::new(Cause::Missing("endpoint"));
        assert!(err.is_configuration());

        let err = err.prepend(Cause::Transport("tls backend unavailable".into()));
        assert!(!err.is_configuration());
    }

    #[test]
    fn body_comes_from_status_cause() {
        let err = Error::new(Cause::Status {
            method: "GET".into(),
            url: "https://ctrl.example/x".into(),
            status: "500 Internal Server Error".into(),
            code: 500,
            body: "{\"meta\":{\"rc\":\"error\"}}".into(),
        });
        assert_eq!(err.status_code(), Some(500));
        assert!(err.body().is_some_and(|b| b.contains("rc")));
        assert!(err.to_string().contains("500 Internal Server Error"));
    }
}
