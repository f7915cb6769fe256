use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Span, debug, error, info, instrument, warn};

use super::panic_message;
use super::refresh::RankRefresher;
use crate::db::{Repository, StoreError};

/// Outcome of one pass over every tracked player.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    pub changed: usize,
    pub failed: usize,
    /// Stopped early because the API key was rejected.
    pub aborted: bool,
}

struct Running {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs a sweep on every tick, one at a time.
pub struct PollingScheduler {
    repo: Repository,
    refresher: Arc<RankRefresher>,
    interval: Duration,
    sweep_timeout: Duration,
    refresh_timeout: Duration,
    running: Mutex<Option<Running>>,
}

impl PollingScheduler {
    pub fn new(
        repo: Repository,
        refresher: Arc<RankRefresher>,
        interval: Duration,
        sweep_timeout: Duration,
        refresh_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            refresher,
            interval,
            sweep_timeout,
            refresh_timeout,
            running: Mutex::new(None),
        }
    }

    /// Spawn the timer task. Returns `false` if it is already running.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut running = self.lock();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            warn!("🔄 Rank poller already running");
            return false;
        }

        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(Arc::clone(self).run(rx));
        *running = Some(Running { shutdown, handle });

        info!(
            interval_secs = self.interval.as_secs(),
            sweep_timeout_secs = self.sweep_timeout.as_secs(),
            refresh_timeout_secs = self.refresh_timeout.as_secs(),
            "🔄 Rank poller started"
        );
        true
    }

    /// Signal the timer task and wait for it to finish.
    pub async fn stop(&self) {
        let running = self.lock().take();
        let Some(Running { shutdown, handle }) = running else {
            return;
        };

        let _ = shutdown.send(true);
        if let Err(e) = handle.await {
            error!(error = %e, "🔄 ❌ Rank poller task ended abnormally");
        }
        info!("🔄 Rank poller stopped");
    }

    pub fn is_running(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Running>> {
        self.running
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }

            tokio::select! {
                _ = self.guarded_sweep() => {}
                _ = shutdown.changed() => break,
            }
        }
    }

    /// One sweep with errors, panics and overruns turned into logs.
    async fn guarded_sweep(&self) -> Option<SweepReport> {
        let sweep = AssertUnwindSafe(self.sweep()).catch_unwind();

        match tokio::time::timeout(self.sweep_timeout, sweep).await {
            Ok(Ok(Ok(report))) => {
                info!(
                    checked = report.checked,
                    changed = report.changed,
                    failed = report.failed,
                    aborted = report.aborted,
                    "🔄 ✅ Sweep finished"
                );
                Some(report)
            }
            Ok(Ok(Err(e))) => {
                error!(error = %e, "🔄 ❌ Sweep failed");
                None
            }
            Ok(Err(panic)) => {
                error!(panic = %panic_message(panic.as_ref()), "🔄 ❌ Sweep panicked");
                None
            }
            Err(_) => {
                error!(
                    timeout_secs = self.sweep_timeout.as_secs(),
                    "🔄 ❌ Sweep timed out"
                );
                None
            }
        }
    }

    /// Refresh every tracked player, whatever community follows them.
    #[instrument(skip_all, fields(identity_count))]
    pub async fn sweep(&self) -> Result<SweepReport, StoreError> {
        let identities = self.repo.all_identities().await?;
        Span::current().record("identity_count", identities.len());

        let mut report = SweepReport::default();
        if identities.is_empty() {
            debug!("🔄 No players tracked, skipping sweep");
            return Ok(report);
        }

        for identity in &identities {
            report.checked += 1;

            let refresh = AssertUnwindSafe(self.refresher.refresh(identity)).catch_unwind();
            let Ok(outcome) = tokio::time::timeout(self.refresh_timeout, refresh).await else {
                report.failed += 1;
                warn!(
                    riot_id = %identity.key(),
                    timeout_secs = self.refresh_timeout.as_secs(),
                    "🔄 ⚠️ Player refresh timed out"
                );
                continue;
            };

            match outcome {
                Ok(Ok(change)) => {
                    if change.is_changed() {
                        report.changed += 1;
                    }
                }
                Ok(Err(e)) if e.is_auth() => {
                    report.failed += 1;
                    report.aborted = true;
                    error!(
                        error = %e,
                        "🔑 ❌ Riot API key rejected, aborting this sweep. Check RIOT_API_KEY"
                    );
                    break;
                }
                Ok(Err(e)) => {
                    report.failed += 1;
                    warn!(error = %e, riot_id = %identity.key(), "🔄 ⚠️ Failed to refresh player");
                }
                Err(panic) => {
                    report.failed += 1;
                    error!(
                        panic = %panic_message(panic.as_ref()),
                        riot_id = %identity.key(),
                        "🔄 ❌ Player refresh panicked"
                    );
                }
            }
        }

        Ok(report)
    }
}
