//! Running fetches off the caller's task.
//!
//! Each [`FetchSession::submit`] spawns one fetch and the outcome comes back
//! through a channel. When fetches overlap, the newest request wins: an outcome
//! older than one already delivered is dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{WeatherError, WeatherResult, provider::WeatherProvider};

#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub city: String,
    pub result: Result<WeatherResult, WeatherError>,
}

#[derive(Debug)]
pub struct FetchSession {
    provider: Arc<dyn WeatherProvider>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
    next_seq: u64,
    pending: usize,
    last_delivered: Option<u64>,
}

impl FetchSession {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            tx,
            rx,
            next_seq: 0,
            pending: 0,
            last_delivered: None,
        }
    }

    /// Start a fetch for `city` and return its sequence number.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, city: impl Into<String>) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let city = city.into();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();

        debug!(seq, %city, "Submitting fetch");
        tokio::spawn(async move {
            let fetch = {
                let city = city.clone();
                tokio::spawn(async move { provider.fetch(&city).await })
            };

            // A fetch task that panicked or was aborted still owes this seq an outcome.
            let result = fetch.await.unwrap_or_else(|join_err| {
                warn!(seq, %city, "Fetch task failed: {join_err}");
                Err(WeatherError::request(join_err))
            });

            // The session owns the receiver; a failed send means it was dropped.
            let _ = tx.send(FetchOutcome { seq, city, result });
        });

        self.pending += 1;
        seq
    }

    /// Wait for the next outcome worth displaying.
    ///
    /// Returns `None` once nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<FetchOutcome> {
        while self.pending > 0 {
            let outcome = self.rx.recv().await?;
            self.pending -= 1;

            if self.last_delivered.is_some_and(|last| outcome.seq < last) {
                debug!(seq = outcome.seq, "Dropping superseded outcome");
                continue;
            }

            self.last_delivered = Some(outcome.seq);
            return Some(outcome);
        }

        None
    }

    pub fn pending(&self) -> usize {
        self.pending
    }
}
