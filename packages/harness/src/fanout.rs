use tokio_util::sync::CancellationToken;

use crate::{Client, HarnessError, SessionSummary, config::Variant};

/// How one client in a [`FanOut`] ended.
pub type ClientOutcome = Result<SessionSummary, HarnessError>;

/// Runs `count` independent clients against the same endpoint.
///
/// Clients share only the cancellation token. One client closing or failing
/// never affects the others.
#[derive(Debug, Clone)]
pub struct FanOut {
    url: String,
    count: usize,
    variant: Variant,
}

impl FanOut {
    /// # Errors
    ///
    /// * [`HarnessError::InvalidClientCount`] if `count` is zero
    pub fn new(
        url: impl Into<String>,
        count: usize,
        variant: Variant,
    ) -> Result<Self, HarnessError> {
        if count < 1 {
            return Err(HarnessError::InvalidClientCount(count));
        }

        Ok(Self {
            url: url.into(),
            count,
            variant,
        })
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// The clients this fan-out will run, in spawn order.
    #[must_use]
    pub fn clients(&self, token: &CancellationToken) -> Vec<Client> {
        let options = self.variant.client_options();

        self.variant
            .name_style()
            .names(self.count)
            .map(|name| {
                Client::new(self.url.as_str(), name)
                    .with_options(options)
                    .with_cancellation_token(token.clone())
            })
            .collect()
    }

    /// Spawns every client and waits for all of them to finish.
    ///
    /// Outcomes are returned in spawn order.
    pub async fn run(&self, token: CancellationToken) -> Vec<ClientOutcome> {
        log::debug!("Starting {} client(s) ({} variant)", self.count, self.variant);

        let tasks = self.clients(&token).into_iter().map(|client| {
            tokio::spawn(async move {
                let outcome = client.run().await;
                if let Err(e) = &outcome {
                    log::error!("[{}] Error: {e}", client.username());
                }
                outcome
            })
        });

        futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_else(|e| Err(HarnessError::Join(e.to_string()))))
            .collect()
    }
}
