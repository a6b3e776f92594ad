// Response envelope decoding
//
// Listing endpoints wrap their payload as `{"meta":{"rc":"ok"},"data":[...]}`.
// Only `data` is returned; a malformed body fails the whole listing.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::model::{Client, Device, Event};

/// Maximum body length quoted in a decode error.
const PREVIEW_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed controller response: {message} (body preview: {preview:?})")]
    Json { message: String, preview: String },

    #[error("controller returned rc={rc}: {message}")]
    Controller { rc: String, message: String },
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    rc: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

/// UniFi OS sometimes answers `{"error":{"code":N,"message":"..."}}` with HTTP 200.
#[derive(Debug, Deserialize)]
struct OsError {
    error: OsErrorBody,
}

#[derive(Debug, Deserialize)]
struct OsErrorBody {
    code: i64,
    #[serde(default)]
    message: Option<String>,
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_LEN).collect()
}

/// Decode an enveloped listing into its `data` records.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, DecodeError> {
    if let Ok(wrapper) = serde_json::from_str::<OsError>(body) {
        return Err(DecodeError::Controller {
            rc: wrapper.error.code.to_string(),
            message: wrapper.error.message.unwrap_or_default(),
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| DecodeError::Json {
        message: e.to_string(),
        preview: preview(body),
    })?;

    if let Some(Meta { rc: Some(rc), msg }) = envelope.meta {
        if rc != "ok" {
            debug!(rc = %rc, "controller reported failure");
            return Err(DecodeError::Controller {
                message: msg.unwrap_or_else(|| format!("rc={rc}")),
                rc,
            });
        }
    }

    trace!(records = envelope.data.len(), "decoded envelope");
    Ok(envelope.data)
}

pub fn decode_clients(body: &str) -> Result<Vec<Client>, DecodeError> {
    decode(body)
}

pub fn decode_devices(body: &str) -> Result<Vec<Device>, DecodeError> {
    decode(body)
}

pub fn decode_events(body: &str) -> Result<Vec<Event>, DecodeError> {
    decode(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn returns_data_only() {
        let body = r#"{"meta":{"rc":"ok"},"data":[{"mac":"AA:00:00:00:00:01","ip":"10.0.0.1"}]}"#;
        let clients = decode_clients(body).unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].mac.as_str(), "aa:00:00:00:00:01");
    }

    #[test]
    fn missing_meta_is_accepted() {
        let devices = decode_devices(r#"{"data":[{"name":"core-sw"}]}"#).unwrap();
        assert_eq!(devices[0].name, "core-sw");
        assert!(decode_events("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_fails_the_listing() {
        let err = decode_clients(r#"{"meta":{"rc":"ok"},"data":[{"mac":"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json { .. }));
        assert!(err.to_string().contains("malformed controller response"));
    }

    #[test]
    fn controller_error_surfaces_message() {
        let err =
            decode_devices(r#"{"meta":{"rc":"error","msg":"api.err.NoSiteContext"},"data":[]}"#)
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "controller returned rc=error: api.err.NoSiteContext"
        );
    }

    #[test]
    fn unifi_os_error_shape() {
        let err = decode_clients(r#"{"error":{"code":401,"message":"Unauthorized"}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Controller { ref rc, .. } if rc == "401"));
    }
}
