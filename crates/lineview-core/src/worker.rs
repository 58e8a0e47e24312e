//! Background highlighting.
//!
//! [`HighlightWorker`] runs a [`StyleSpanComputer`] on its own thread. Each request carries a
//! frozen `Arc<str>` snapshot of the text and the revision it was taken at; results come back
//! through a channel and are applied by the owner on its own (UI) thread.
//!
//! Stale work is cancelled at three points:
//! - queued requests are drained and only the newest one is computed
//! - a request older than the latest submitted revision is skipped before computing
//! - a result that went stale while computing is dropped instead of sent

use crate::processing::{HighlightError, StyleSpanComputer};
use crate::spans::StyleSpan;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug)]
struct HighlightRequest {
    revision: u64,
    text: Arc<str>,
}

/// A finished highlighting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOutcome {
    /// Text revision the pass was computed for.
    pub revision: u64,
    /// Normalized spans, or the error of the pass.
    pub result: Result<Vec<StyleSpan>, HighlightError>,
}

/// A highlighter running on a dedicated thread.
pub struct HighlightWorker {
    name: &'static str,
    tx: Option<mpsc::Sender<HighlightRequest>>,
    rx: mpsc::Receiver<HighlightOutcome>,
    latest: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for HighlightWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightWorker")
            .field("name", &self.name)
            .field("latest", &self.latest.load(Ordering::Acquire))
            .finish()
    }
}

impl HighlightWorker {
    /// Move `computer` onto a new thread.
    pub fn spawn(computer: Box<dyn StyleSpanComputer>) -> Result<Self, HighlightError> {
        let name = computer.name();
        let (tx_req, rx_req) = mpsc::channel::<HighlightRequest>();
        let (tx_out, rx_out) = mpsc::channel::<HighlightOutcome>();
        let latest = Arc::new(AtomicU64::new(0));

        let handle = {
            let latest = latest.clone();
            thread::Builder::new()
                .name(format!("lineview-highlight-{name}"))
                .spawn(move || highlight_loop(computer, rx_req, tx_out, latest))
                .map_err(|e| HighlightError::Internal(e.to_string()))?
        };
        tracing::debug!(highlighter = name, "highlight worker started");

        Ok(Self {
            name,
            tx: Some(tx_req),
            rx: rx_out,
            latest,
            handle: Some(handle),
        })
    }

    /// Name of the wrapped highlighter.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Newest revision submitted so far.
    pub fn latest_revision(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Submit a snapshot. Any older pending or in-flight request becomes stale.
    pub fn request(&self, revision: u64, text: Arc<str>) -> Result<(), HighlightError> {
        self.latest.fetch_max(revision, Ordering::AcqRel);
        let tx = self.tx.as_ref().ok_or(HighlightError::WorkerStopped)?;
        tx.send(HighlightRequest { revision, text })
            .map_err(|_| HighlightError::WorkerStopped)
    }

    /// Next finished pass, without blocking.
    pub fn try_recv(&self) -> Option<HighlightOutcome> {
        self.rx.try_recv().ok()
    }

    /// Next finished pass, waiting up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<HighlightOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl Drop for HighlightWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the loop.
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!(highlighter = self.name, "highlight worker panicked");
        }
    }
}

fn highlight_loop(
    mut computer: Box<dyn StyleSpanComputer>,
    rx: mpsc::Receiver<HighlightRequest>,
    tx: mpsc::Sender<HighlightOutcome>,
    latest: Arc<AtomicU64>,
) {
    while let Ok(mut request) = rx.recv() {
        while let Ok(newer) = rx.try_recv() {
            request = newer;
        }
        if request.revision < latest.load(Ordering::Acquire) {
            tracing::debug!(revision = request.revision, "skipping stale highlight request");
            continue;
        }

        let result = computer.compute(&request.text);

        if request.revision < latest.load(Ordering::Acquire) {
            tracing::debug!(revision = request.revision, "dropping stale highlight result");
            continue;
        }
        let outcome = HighlightOutcome {
            revision: request.revision,
            result,
        };
        if tx.send(outcome).is_err() {
            break;
        }
    }
    tracing::debug!(highlighter = computer.name(), "highlight worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::PlainText;

    /// Reports each text it is asked to highlight, then waits for a permit.
    struct Gated {
        started: mpsc::Sender<String>,
        permits: mpsc::Receiver<()>,
    }

    impl StyleSpanComputer for Gated {
        fn name(&self) -> &'static str {
            "gated"
        }

        fn compute_raw(&mut self, text: &str) -> Result<Vec<StyleSpan>, HighlightError> {
            let _ = self.started.send(text.to_string());
            self.permits
                .recv()
                .map_err(|_| HighlightError::Internal("permits closed".to_string()))?;
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_worker_round_trip() {
        let worker = HighlightWorker::spawn(Box::new(PlainText)).unwrap();
        worker.request(1, Arc::from("abc")).unwrap();

        let outcome = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.revision, 1);
        assert_eq!(outcome.result, Ok(vec![StyleSpan::plain(0, 3)]));
    }

    #[test]
    fn test_requests_queued_behind_busy_worker_collapse_to_newest() {
        let (started_tx, started_rx) = mpsc::channel();
        let (permit_tx, permit_rx) = mpsc::channel();
        let worker = HighlightWorker::spawn(Box::new(Gated {
            started: started_tx,
            permits: permit_rx,
        }))
        .unwrap();

        worker.request(1, Arc::from("one")).unwrap();
        assert_eq!(started_rx.recv_timeout(Duration::from_secs(5)).unwrap(), "one");

        worker.request(2, Arc::from("two")).unwrap();
        worker.request(3, Arc::from("three")).unwrap();
        assert_eq!(worker.latest_revision(), 3);

        permit_tx.send(()).unwrap();
        permit_tx.send(()).unwrap();

        let outcome = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.revision, 3);
        assert_eq!(outcome.result, Ok(vec![StyleSpan::plain(0, 5)]));

        drop(worker);
        let computed: Vec<String> = started_rx.try_iter().collect();
        assert_eq!(computed, ["three"]);
    }
}
