//! Endpoint and per-client settings.
//!
//! The two fan-out presets in [`Variant`] differ in naming, handshake, and
//! script display. They are alternative configurations; neither is the
//! canonical one.

use crate::{display::ScriptDisplay, naming::NameStyle};

/// The Proxima server's WebSocket endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:13376";

/// Username used by `test_client` when none is given.
pub const DEFAULT_USERNAME: &str = "Player1";

/// Clients started by `test_multiple_clients` when no count is given.
pub const DEFAULT_CLIENT_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientOptions {
    /// Send `ready` before `register`.
    pub send_ready: bool,
    pub script_display: ScriptDisplay,
}

impl ClientOptions {
    #[must_use]
    pub const fn with_ready(mut self, send_ready: bool) -> Self {
        self.send_ready = send_ready;
        self
    }

    #[must_use]
    pub const fn with_script_display(mut self, script_display: ScriptDisplay) -> Self {
        self.script_display = script_display;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Variant {
    /// `player{n}` names, `register` only, scripts truncated to 100 chars.
    #[default]
    Compact,
    /// `Player{n}` names, `ready` then `register`, scripts shown in full.
    Ready,
}

impl Variant {
    #[must_use]
    pub const fn name_style(self) -> NameStyle {
        match self {
            Self::Compact => NameStyle::Lowercase,
            Self::Ready => NameStyle::Capitalized,
        }
    }

    #[must_use]
    pub const fn client_options(self) -> ClientOptions {
        match self {
            Self::Compact => ClientOptions {
                send_ready: false,
                script_display: ScriptDisplay::truncated(),
            },
            Self::Ready => ClientOptions {
                send_ready: true,
                script_display: ScriptDisplay::Full,
            },
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Ready => "ready",
        })
    }
}
