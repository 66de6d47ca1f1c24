#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Test clients for the Proxima WebSocket server.
//!
//! A [`Client`] connects, registers a display name, then loops over inbound
//! frames: it answers `ping` with `pong`, prints `execute` scripts (it never
//! runs them), and logs anything else. [`FanOut`] runs several independent
//! clients side by side.
//!
//! ```rust,no_run
//! # use proxima_harness::{Client, DEFAULT_URL};
//! # async fn example() -> Result<(), proxima_harness::HarnessError> {
//! let summary = Client::new(DEFAULT_URL, "Player1").run().await?;
//! println!("answered {} pings", summary.pings_answered);
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod client;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod display;
mod fanout;
pub mod message;
pub mod naming;

pub use client::{Action, Client};
pub use config::{ClientOptions, DEFAULT_URL, Variant};
pub use fanout::{ClientOutcome, FanOut};
pub use message::{Frame, Message};
pub use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("Transport error: {0}")]
    Transport(tokio_tungstenite::tungstenite::Error),
    #[error("Failed to send: {0}")]
    Send(tokio_tungstenite::tungstenite::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error("Number of clients must be at least 1 (got {0})")]
    InvalidClientCount(usize),
    #[error("Client task failed: {0}")]
    Join(String),
}

/// Why a client's receive loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The server closed the connection.
    Closed,
    /// The connection dropped without a close handshake.
    Reset,
    /// The cancellation token fired.
    Cancelled,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed by server",
            Self::Reset => "reset",
            Self::Cancelled => "cancelled",
        })
    }
}

/// What happened over one client's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub username: String,
    pub pings_answered: usize,
    pub scripts_received: usize,
    pub unknown_frames: usize,
    pub malformed_frames: usize,
    pub close_reason: CloseReason,
}

impl SessionSummary {
    #[must_use]
    pub const fn new(username: String, close_reason: CloseReason) -> Self {
        Self {
            username,
            pings_answered: 0,
            scripts_received: 0,
            unknown_frames: 0,
            malformed_frames: 0,
            close_reason,
        }
    }

    fn record(&mut self, frame: &Frame) {
        match frame {
            Frame::Message(Message::Execute { .. }) => self.scripts_received += 1,
            Frame::Message(_) => {}
            Frame::Unknown { .. } => self.unknown_frames += 1,
            Frame::Malformed(_) => self.malformed_frames += 1,
        }
    }
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({} pings answered, {} scripts, {} unknown, {} malformed)",
            self.username,
            self.close_reason,
            self.pings_answered,
            self.scripts_received,
            self.unknown_frames,
            self.malformed_frames,
        )
    }
}
