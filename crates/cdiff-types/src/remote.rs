//! The payload a remote install's diff endpoint answers with.
//!
//! Fetching is left to the caller; this module only decodes what came back
//! and tells an error response apart from a legitimately empty snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RemoteError, RemoteResult};
use crate::record::{is_envelope, Snapshot, ENVELOPE_KEY};

/// Label used in error messages when the caller gives none.
const DEFAULT_REMOTE_LABEL: &str = "Remote";

/// Deployment environment a remote snapshot was taken from.
///
/// Deserializing never fails on the name: unknown names mean staging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Environment {
    Local,
    #[default]
    Staging,
    Production,
}

impl Environment {
    /// Parse an environment name; anything unrecognised means staging.
    pub fn parse_or_default(name: &str) -> Self {
        match name {
            "local" => Self::Local,
            "production" => Self::Production,
            _ => Self::Staging,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Human-readable name, e.g. for "Production returned: ..." messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Self::parse_or_default(&name)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded remote response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePayload {
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub environment: Option<Environment>,
    pub entries_by_section: Snapshot,
}

/// Whether a parsed body is a diff endpoint response rather than a bare
/// snapshot: an envelope, or an error object whose `error` or `message` is a
/// string. Sections are never strings, so a snapshot with a section named
/// `message` stays a snapshot.
pub fn is_remote_response(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    if map.contains_key(ENVELOPE_KEY) {
        return is_envelope(map);
    }
    ["error", "message"]
        .iter()
        .any(|k| map.get(*k).is_some_and(Value::is_string))
}

/// Decode a remote diff endpoint body.
///
/// `environment_label` prefixes a remote-supplied error message
/// (`"Production returned: Unauthorized"`).
pub fn decode_remote_payload(
    body: &str,
    environment_label: Option<&str>,
) -> RemoteResult<RemotePayload> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => decode_remote_value(value, environment_label),
        Err(_) => Err(RemoteError::InvalidResponse),
    }
}

/// [`decode_remote_payload`] for a body that is already parsed.
pub fn decode_remote_value(
    value: Value,
    environment_label: Option<&str>,
) -> RemoteResult<RemotePayload> {
    let Value::Object(mut map) = value else {
        return Err(RemoteError::InvalidResponse);
    };

    match map.remove(ENVELOPE_KEY) {
        Some(entries @ (Value::Object(_) | Value::Array(_))) => {
            let entries_by_section = Snapshot::from_value(entries)?;
            let site_url = map
                .get("siteUrl")
                .and_then(Value::as_str)
                .map(str::to_owned);
            let environment = map
                .get("environment")
                .and_then(Value::as_str)
                .map(Environment::parse_or_default);
            Ok(RemotePayload {
                site_url,
                environment,
                entries_by_section,
            })
        }
        _ => {
            let message = map
                .get("message")
                .filter(|v| !v.is_null())
                .or_else(|| map.get("error"))
                .and_then(Value::as_str);
            match message {
                Some(message) => Err(RemoteError::Remote {
                    label: environment_label
                        .filter(|l| !l.is_empty())
                        .unwrap_or(DEFAULT_REMOTE_LABEL)
                        .to_owned(),
                    message: message.to_owned(),
                }),
                None => Err(RemoteError::InvalidResponse),
            }
        }
    }
}
