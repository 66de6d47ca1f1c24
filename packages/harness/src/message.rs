//! JSON messages exchanged with the Proxima server.
//!
//! Every frame is a JSON object carrying a `type` field. Outbound messages are
//! built with the [`Message`] constructors; inbound text is classified with
//! [`Frame::parse`], which never fails: anything that is not a known message
//! is surfaced as [`Frame::Unknown`] or [`Frame::Malformed`] so the receive
//! loop can log it and carry on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message with a known `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Announces the client's display name.
    Register { username: String },
    /// Asks the server to dispatch pending scripts right away.
    Ready,
    /// Keepalive probe from the server.
    Ping,
    /// Keepalive reply to a [`Message::Ping`].
    Pong,
    /// A script payload for the client to display.
    #[serde(alias = "exec")]
    Execute {
        #[serde(default)]
        script: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        redirect: Option<bool>,
    },
}

impl Message {
    #[must_use]
    pub fn register(username: impl Into<String>) -> Self {
        Self::Register {
            username: username.into(),
        }
    }

    #[must_use]
    pub const fn ready() -> Self {
        Self::Ready
    }

    #[must_use]
    pub const fn pong() -> Self {
        Self::Pong
    }

    #[must_use]
    pub fn execute(script: impl Into<String>) -> Self {
        Self::Execute {
            script: script.into(),
            redirect: None,
        }
    }

    /// The wire name of this message's `type`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Ready => "ready",
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Execute { .. } => "execute",
        }
    }

    /// Whether `kind` is a `type` this client understands, aliases included.
    #[must_use]
    pub fn is_known_kind(kind: &str) -> bool {
        matches!(
            kind,
            "register" | "ready" | "ping" | "pong" | "execute" | "exec"
        )
    }

    /// Serializes to compact JSON.
    ///
    /// # Errors
    ///
    /// * If serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// One inbound text frame, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Message(Message),
    /// Valid JSON that isn't a known message. `kind` is the `type` field, if
    /// there was a string one.
    Unknown { kind: Option<String>, raw: Value },
    /// Text that isn't JSON at all.
    Malformed(String),
}

impl Frame {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                log::trace!("Frame is not JSON: {e}");
                return Self::Malformed(text.to_string());
            }
        };

        match Message::deserialize(&value) {
            Ok(message) => Self::Message(message),
            Err(e) => {
                log::trace!("Frame is not a known message: {e}");
                Self::Unknown {
                    kind: value
                        .get("type")
                        .and_then(Value::as_str)
                        .map(ToString::to_string),
                    raw: value,
                }
            }
        }
    }
}
