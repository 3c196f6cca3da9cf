use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::Article;
use crate::errors::NewsResult;
use crate::presenter::ArticlePresenter;
use crate::services::connectivity::ConnectivityProbe;
use crate::sources::traits::ArticleSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Success,
    Failed,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        *self == LoadState::Loading
    }
}

/// Result of one fetch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetch and parse ran. Transport and parse failures show up as an empty list.
    Loaded(Vec<Article>),
    /// The network was unreachable, the fetch was never attempted.
    NoConnectivity,
}

impl LoadOutcome {
    fn final_state(&self) -> LoadState {
        match self {
            LoadOutcome::Loaded(_) => LoadState::Success,
            LoadOutcome::NoConnectivity => LoadState::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Discarded,
}

/// Runs fetch cycles for one screen, at most one at a time.
///
/// Each cycle runs on the blocking pool and hands its result back through a
/// one-shot channel. Destroying the service cancels every pending delivery.
pub struct LoadService {
    source: Arc<dyn ArticleSource>,
    connectivity: Arc<dyn ConnectivityProbe>,
    state: Arc<watch::Sender<LoadState>>,
    screen: CancellationToken,
}

impl LoadService {
    pub fn new(source: Arc<dyn ArticleSource>, connectivity: Arc<dyn ConnectivityProbe>) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);

        Self {
            source,
            connectivity,
            state: Arc::new(state),
            screen: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> LoadState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Start a fetch cycle for `url`.
    ///
    /// Returns `None` when a cycle is already loading or the screen is gone.
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self, url: String) -> Option<PendingLoad> {
        if self.screen.is_cancelled() {
            debug!("Screen destroyed, ignoring load trigger");
            return None;
        }

        let started = self.state.send_if_modified(|state| {
            if state.is_loading() {
                false
            } else {
                *state = LoadState::Loading;
                true
            }
        });

        if !started {
            debug!("Load already in flight, ignoring trigger");
            return None;
        }

        let (tx, rx) = oneshot::channel();
        let cancel = self.screen.child_token();

        let source = Arc::clone(&self.source);
        let connectivity = Arc::clone(&self.connectivity);
        let state = Arc::clone(&self.state);
        let worker_cancel = cancel.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = CycleGuard {
                state,
                finished: LoadState::Failed,
            };
            let outcome = run_cycle(source.as_ref(), connectivity.as_ref(), &url);
            guard.finished = outcome.final_state();
            drop(guard);

            if worker_cancel.is_cancelled() {
                debug!("Screen destroyed during load, discarding result");
                return;
            }

            if tx.send(outcome).is_err() {
                debug!("Load result dropped before delivery");
            }
        });

        Some(PendingLoad { outcome: rx, cancel })
    }

    /// Tear down the screen. Pending results are dropped, not presented.
    pub fn destroy(&self) {
        self.screen.cancel();
    }

    pub fn is_destroyed(&self) -> bool {
        self.screen.is_cancelled()
    }
}

/// Publishes the cycle's final state when dropped, `Failed` if it unwound.
struct CycleGuard {
    state: Arc<watch::Sender<LoadState>>,
    finished: LoadState,
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!("Fetch cycle panicked");
        }
        self.state.send_replace(self.finished);
    }
}

fn run_cycle(
    source: &dyn ArticleSource,
    connectivity: &dyn ConnectivityProbe,
    url: &str,
) -> LoadOutcome {
    if !connectivity.is_connected() {
        warn!("No network connectivity, skipping fetch");
        return LoadOutcome::NoConnectivity;
    }

    LoadOutcome::Loaded(source.fetch_articles(url))
}

/// A single in-flight cycle, delivered at most once
#[must_use = "a pending load does nothing unless delivered"]
pub struct PendingLoad {
    outcome: oneshot::Receiver<LoadOutcome>,
    cancel: CancellationToken,
}

impl PendingLoad {
    /// Wait for the cycle and hand its result to `presenter`.
    pub async fn deliver<P: ArticlePresenter + ?Sized>(
        self,
        presenter: &mut P,
    ) -> NewsResult<Delivery> {
        let PendingLoad { outcome, cancel } = self;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(Delivery::Discarded),
            received = outcome => match received {
                Ok(outcome) => outcome,
                Err(_) => return Ok(Delivery::Discarded),
            },
        };

        if cancel.is_cancelled() {
            return Ok(Delivery::Discarded);
        }

        match outcome {
            LoadOutcome::Loaded(articles) => presenter.show_articles(&articles)?,
            LoadOutcome::NoConnectivity => presenter.show_no_connectivity()?,
        }

        Ok(Delivery::Delivered)
    }
}
