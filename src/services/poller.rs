use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::services::fetcher::MatchSource;
use crate::view::SharedView;

/// How often the fixture page refreshes its table.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Drives periodic refreshes of a fixture view.
///
/// Every tick spawns an independent fetch and returns immediately, so slow
/// responses may overlap. Each fetch is numbered; the view only applies a
/// result newer than the last one it applied.
pub struct Poller<S> {
    source: Arc<S>,
    view: SharedView,
    period: Duration,
    seq: Arc<AtomicU64>,
}

impl<S: MatchSource + 'static> Poller<S> {
    pub fn new(source: Arc<S>, view: SharedView, period: Duration) -> Self {
        Self {
            source,
            view,
            period,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start a fetch in the background without waiting for it.
    /// The handle resolves to whether the table was rebuilt.
    pub fn spawn_refresh(&self) -> JoinHandle<bool> {
        let seq = self.next_seq();
        tokio::spawn(refresh(Arc::clone(&self.source), Arc::clone(&self.view), seq))
    }

    /// Tick until `shutdown` flips to true, then tear the view down.
    ///
    /// The first tick fires one full period after start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Fixture poller started, refreshing every {:?}", self.period);

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.spawn_refresh();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.view.write().await.teardown();
        tracing::info!("Fixture poller stopped");
    }
}

async fn refresh<S: MatchSource + ?Sized>(source: Arc<S>, view: SharedView, seq: u64) -> bool {
    match source.fetch_partidos().await {
        Ok(partidos) => view.write().await.accept(seq, &partidos),
        Err(e) => {
            tracing::error!(seq, "Error refreshing fixture data: {}", e);
            view.write().await.record_failure();
            false
        }
    }
}
