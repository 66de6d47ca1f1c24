//! Shared plumbing for the `test_client` and `test_multiple_clients` binaries.

use tokio_util::sync::CancellationToken;

use crate::ClientOutcome;

/// Cancels `token` on Ctrl-C.
pub fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Received interrupt signal");
                token.cancel();
            }
            Err(err) => {
                log::error!("Error setting up signal handler: {err}");
            }
        }
    });
}

/// Logs each outcome and returns the process exit status: 1 if any client
/// ended in an error, 0 otherwise.
#[must_use]
pub fn report(outcomes: &[ClientOutcome]) -> i32 {
    let mut status = 0;

    for outcome in outcomes {
        match outcome {
            Ok(summary) => log::info!("{summary}"),
            Err(e) => {
                eprintln!("Error: {e}");
                status = 1;
            }
        }
    }

    status
}

/// `count` as a client count, or `None` if it is below 1.
#[must_use]
pub fn client_count(count: i64) -> Option<usize> {
    usize::try_from(count).ok().filter(|count| *count >= 1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CloseReason, HarnessError, SessionSummary};

    #[test_log::test]
    fn report_is_zero_when_every_client_ended_cleanly() {
        let outcomes = vec![
            Ok(SessionSummary::new("player1".to_string(), CloseReason::Closed)),
            Ok(SessionSummary::new("player2".to_string(), CloseReason::Cancelled)),
        ];
        assert_eq!(report(&outcomes), 0);
    }

    #[test_log::test]
    fn report_is_one_when_any_client_failed() {
        let outcomes = vec![
            Ok(SessionSummary::new("player1".to_string(), CloseReason::Closed)),
            Err(HarnessError::Join("panicked".to_string())),
        ];
        assert_eq!(report(&outcomes), 1);
    }

    #[test_log::test]
    fn client_count_rejects_zero_and_negative() {
        assert_eq!(client_count(3), Some(3));
        assert_eq!(client_count(0), None);
        assert_eq!(client_count(-2), None);
    }
}
