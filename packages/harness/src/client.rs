use std::time::Duration;

use futures_util::{SinkExt as _, StreamExt as _};
use tokio::{net::TcpStream, select};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message as WsMessage, error::ProtocolError},
};
use tokio_util::sync::CancellationToken;

use crate::{
    CloseReason, HarnessError, SessionSummary,
    config::ClientOptions,
    message::{Frame, Message},
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// What the receive loop does with one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send this message back.
    Reply(Message),
    /// Print this text to the operator.
    Display(String),
    /// Nothing beyond logging.
    Skip,
}

/// A single test connection to the Proxima server.
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    username: String,
    options: ClientOptions,
    cancellation_token: CancellationToken,
}

impl Client {
    #[must_use]
    pub fn new(url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            options: ClientOptions::default(),
            cancellation_token: CancellationToken::new(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the token that stops [`Client::run`].
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn print(&self, line: impl std::fmt::Display) {
        println!("[{}] {line}", self.username);
    }

    /// Decides how to respond to `frame`. Never executes anything.
    #[must_use]
    pub fn handle_frame(&self, frame: &Frame) -> Action {
        let name = &self.username;

        match frame {
            Frame::Message(Message::Ping) => {
                log::debug!("[{name}] Received ping, sending pong");
                Action::Reply(Message::pong())
            }
            Frame::Message(Message::Execute { script, .. }) => {
                log::debug!("[{name}] Received script ({} bytes)", script.len());
                Action::Display(self.options.script_display.render(script))
            }
            Frame::Message(message) => {
                log::warn!("[{name}] Unexpected message from server: {message}");
                Action::Skip
            }
            Frame::Unknown { kind, raw } => {
                log::warn!("[{name}] {}", describe_unknown(kind.as_deref()));
                log::trace!("[{name}] Unknown message: {raw}");
                Action::Skip
            }
            Frame::Malformed(text) => {
                log::warn!("[{name}] Received non-JSON message: {text}");
                Action::Skip
            }
        }
    }

    async fn send(&self, ws_stream: &mut WsStream, message: &Message) -> Result<(), HarnessError> {
        let json = message.to_json()?;
        proxima_logging::debug_or_trace!(
            ("[{}] Sending {message}", self.username),
            ("[{}] Sending {message} json={json}", self.username)
        );
        ws_stream
            .send(WsMessage::Text(json.into()))
            .await
            .map_err(HarnessError::Send)
    }

    async fn close(&self, ws_stream: &mut WsStream) {
        match tokio::time::timeout(CLOSE_TIMEOUT, ws_stream.close(None)).await {
            Ok(Ok(())) => log::debug!("[{}] Sent close frame", self.username),
            Ok(Err(e)) => log::debug!("[{}] Failed to send close frame: {e:?}", self.username),
            Err(_) => log::debug!("[{}] Timed out sending close frame", self.username),
        }
    }

    /// Connects, registers, and processes frames until the connection closes
    /// or the cancellation token fires.
    ///
    /// # Errors
    ///
    /// * [`HarnessError::Connect`] if the WebSocket handshake fails. There is no retry.
    /// * [`HarnessError::Send`] if a handshake message or `pong` can't be sent
    /// * [`HarnessError::Transport`] if reading from the connection fails
    pub async fn run(&self) -> Result<SessionSummary, HarnessError> {
        log::debug!("[{}] Connecting to websocket '{}'...", self.username, self.url);

        #[allow(clippy::redundant_pub_crate)]
        let connected = select! {
            biased;
            () = self.cancellation_token.cancelled() => {
                log::debug!("[{}] Cancelling connect", self.username);
                return Ok(SessionSummary::new(self.username.clone(), CloseReason::Cancelled));
            }
            resp = connect_async(self.url.as_str()) => resp,
        };

        let (mut ws_stream, _) = connected.map_err(|source| HarnessError::Connect {
            url: self.url.clone(),
            source,
        })?;
        self.print(format_args!("Connected to {}", self.url));

        let summary = self.session(&mut ws_stream).await;

        if matches!(&summary, Ok(s) if s.close_reason == CloseReason::Cancelled) {
            self.close(&mut ws_stream).await;
        }

        summary
    }

    async fn session(&self, ws_stream: &mut WsStream) -> Result<SessionSummary, HarnessError> {
        if self.options.send_ready {
            self.send(ws_stream, &Message::ready()).await?;
            self.print("Sent ready");
        }

        self.send(ws_stream, &Message::register(self.username.as_str()))
            .await?;
        self.print("Sent registration");
        self.print("Waiting for script execution commands...");

        let mut summary = SessionSummary::new(self.username.clone(), CloseReason::Closed);

        loop {
            #[allow(clippy::redundant_pub_crate)]
            let next = select! {
                next = ws_stream.next() => next,
                () = self.cancellation_token.cancelled() => {
                    summary.close_reason = CloseReason::Cancelled;
                    break;
                }
            };

            let message = match next {
                Some(Ok(message)) => message,
                Some(Err(e)) => match close_reason_for(&e) {
                    Some(reason) => {
                        summary.close_reason = reason;
                        break;
                    }
                    None => return Err(HarnessError::Transport(e)),
                },
                None => break,
            };

            match message {
                WsMessage::Text(text) => {
                    let frame = Frame::parse(text.as_str());
                    log::debug!("[{}] Received: {}", self.username, text.as_str());
                    summary.record(&frame);

                    match self.handle_frame(&frame) {
                        Action::Reply(reply) => {
                            self.send(ws_stream, &reply).await?;
                            if reply == Message::Pong {
                                summary.pings_answered += 1;
                                log::debug!("[{}] Ponged", self.username);
                            }
                        }
                        Action::Display(text) => {
                            for line in display_lines(&text) {
                                self.print(line);
                            }
                        }
                        Action::Skip => {}
                    }
                }
                WsMessage::Binary(bytes) => {
                    log::warn!(
                        "[{}] Ignoring binary frame ({} bytes)",
                        self.username,
                        bytes.len()
                    );
                }
                WsMessage::Ping(_) | WsMessage::Pong(_) => {
                    log::trace!("[{}] Received control frame", self.username);
                }
                WsMessage::Close(frame) => {
                    // tungstenite only queues the close reply; flush it before dropping the stream.
                    log::debug!("[{}] Close frame: {frame:?}", self.username);
                    match tokio::time::timeout(CLOSE_TIMEOUT, ws_stream.flush()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            log::debug!("[{}] Failed to flush close reply: {e:?}", self.username);
                        }
                        Err(_) => log::debug!("[{}] Timed out flushing close reply", self.username),
                    }
                    break;
                }
                WsMessage::Frame(_) => {}
            }
        }

        match summary.close_reason {
            CloseReason::Cancelled => self.print("Stopped"),
            reason => self.print(format_args!("Connection {reason}")),
        }

        Ok(summary)
    }
}

fn describe_unknown(kind: Option<&str>) -> String {
    match kind {
        Some(kind) if Message::is_known_kind(kind) => {
            format!("Invalid fields for message type: {kind}")
        }
        Some(kind) => format!("Unknown message type: {kind}"),
        None => "Unknown message type: <none>".to_string(),
    }
}

/// Splits displayed text into printed lines, keeping empty ones.
fn display_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
}

/// Errors that just mean the peer went away.
fn close_reason_for(error: &tungstenite::Error) -> Option<CloseReason> {
    match error {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            Some(CloseReason::Closed)
        }
        tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
            Some(CloseReason::Reset)
        }
        tungstenite::Error::Io(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::BrokenPipe
            ) =>
        {
            Some(CloseReason::Reset)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{config::Variant, display::ScriptDisplay};

    fn client() -> Client {
        Client::new("ws://localhost:13376", "player1").with_options(Variant::Compact.client_options())
    }

    #[test_log::test]
    fn ping_is_answered_with_pong() {
        assert_eq!(
            client().handle_frame(&Frame::parse(r#"{"type":"ping"}"#)),
            Action::Reply(Message::Pong)
        );
    }

    #[test_log::test]
    fn execute_is_displayed_not_replied_to() {
        let script = "s".repeat(150);
        let action = client().handle_frame(&Frame::Message(Message::execute(script.as_str())));
        assert_eq!(
            action,
            Action::Display(format!(
                "Received script to execute:\n{}...",
                "s".repeat(100)
            ))
        );
    }

    #[test_log::test]
    fn execute_uses_full_display_by_default() {
        let client = Client::new("ws://localhost:13376", "Player1");
        assert_eq!(client.options().script_display, ScriptDisplay::Full);
        assert_eq!(
            client.handle_frame(&Frame::Message(Message::execute("print(1)"))),
            Action::Display("--- EXECUTE SCRIPT ---\nprint(1)\n--- END SCRIPT ---".to_string())
        );
    }

    #[test_log::test]
    fn unknown_malformed_and_unexpected_frames_are_skipped() {
        let client = client();
        for text in [
            r#"{"type":"exp_start"}"#,
            "not json",
            r#"{"type":"pong"}"#,
            r#"{"type":"register","username":"server"}"#,
        ] {
            assert_eq!(client.handle_frame(&Frame::parse(text)), Action::Skip, "{text}");
        }
    }

    #[test_log::test]
    fn known_type_with_bad_fields_is_described_as_invalid() {
        assert_eq!(
            describe_unknown(Some("execute")),
            "Invalid fields for message type: execute"
        );
        assert_eq!(
            describe_unknown(Some("exp_start")),
            "Unknown message type: exp_start"
        );
        assert_eq!(describe_unknown(None), "Unknown message type: <none>");
    }

    #[test_log::test]
    fn empty_truncated_script_still_prints_a_payload_line() {
        let Action::Display(text) = client().handle_frame(&Frame::parse(r#"{"type":"execute"}"#))
        else {
            panic!("Expected a display action");
        };
        assert_eq!(
            display_lines(&text).collect::<Vec<_>>(),
            vec!["Received script to execute:", ""]
        );
    }

    #[test_log::test]
    fn empty_full_script_keeps_blank_line_between_banners() {
        let text = ScriptDisplay::Full.render("");
        assert_eq!(
            display_lines(&text).collect::<Vec<_>>(),
            vec!["--- EXECUTE SCRIPT ---", "", "--- END SCRIPT ---"]
        );
    }

    #[test_log::test]
    fn reset_errors_are_not_fatal() {
        assert_eq!(
            close_reason_for(&tungstenite::Error::ConnectionClosed),
            Some(CloseReason::Closed)
        );
        assert_eq!(
            close_reason_for(&tungstenite::Error::Protocol(
                ProtocolError::ResetWithoutClosingHandshake
            )),
            Some(CloseReason::Reset)
        );
        assert_eq!(
            close_reason_for(&tungstenite::Error::Io(std::io::Error::from(
                std::io::ErrorKind::ConnectionReset
            ))),
            Some(CloseReason::Reset)
        );
        assert_eq!(
            close_reason_for(&tungstenite::Error::Io(std::io::Error::other("boom"))),
            None
        );
    }

    #[test_log::test(tokio::test)]
    async fn cancelled_token_skips_connecting() {
        let token = CancellationToken::new();
        token.cancel();

        let summary = Client::new("ws://127.0.0.1:9", "player1")
            .with_cancellation_token(token)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.close_reason, CloseReason::Cancelled);
        assert_eq!(summary.pings_answered, 0);
    }
}
