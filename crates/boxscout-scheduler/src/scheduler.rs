//! The timer/trigger reconciliation loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use boxscout_core::Record;
use boxscout_reconcile::{ReconcileSummary, reconcile};
use boxscout_targets::derive_snapshot;
use tokio::sync::{Notify, watch};
use tracing::{debug, error, info};

use crate::backoff::Backoff;

/// Callback that fetches the full inventory record set for one cycle.
///
/// A total-fetch failure aborts the cycle before any file is touched.
pub type FetchCallback = Box<dyn Fn() -> BoxFuture + Send + Sync>;

type BoxFuture = std::pin::Pin<
    Box<dyn std::future::Future<Output = anyhow::Result<Vec<Record>>> + Send>,
>;

/// Runs reconciliation cycles: one at a time, started by a periodic timer
/// or the shared trigger event, separated by the adaptive backoff delay.
///
/// Triggers coalesce through the `Notify`'s single stored permit: any number
/// of triggers during a running cycle guarantee exactly one prompt follow-up
/// cycle.
pub struct Scheduler {
    fetch_fn: FetchCallback,
    output_dir: PathBuf,
    interval: Duration,
    backoff: Backoff,
    trigger: Arc<Notify>,
}

impl Scheduler {
    pub fn new(
        fetch_fn: FetchCallback,
        output_dir: PathBuf,
        interval: Duration,
        backoff: Backoff,
    ) -> Self {
        Self {
            fetch_fn,
            output_dir,
            interval,
            backoff,
            trigger: Arc::new(Notify::new()),
        }
    }

    /// The trigger event; the webhook handler calls `notify_one()` on it.
    pub fn trigger(&self) -> Arc<Notify> {
        self.trigger.clone()
    }

    /// Run a single reconciliation cycle.
    ///
    /// Fetch failure surfaces before any file I/O, so previously-good output
    /// is never partially overwritten on a dead inventory.
    pub async fn run_cycle(&self) -> anyhow::Result<ReconcileSummary> {
        let records = (self.fetch_fn)().await?;
        debug!(records = records.len(), "inventory fetched");
        let snapshot = derive_snapshot(&records);
        let summary = reconcile(&self.output_dir, &snapshot)?;
        Ok(summary)
    }

    /// Run cycles until shutdown. The first cycle starts immediately.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            directory = %self.output_dir.display(),
            "scheduler started"
        );

        loop {
            match self.run_cycle().await {
                Ok(summary) => info!(
                    written = summary.written.len(),
                    removed = summary.removed.len(),
                    unchanged = summary.unchanged,
                    failed = summary.failed.len(),
                    "cycle complete"
                ),
                Err(error) => {
                    error!(%error, "cycle failed, keeping previous output");
                }
            }

            let delay = self.backoff.next_delay(Instant::now());
            debug!(delay_secs = delay.as_secs(), "inter-cycle delay");

            // Quiet gap: triggers arriving here are held by the Notify and
            // picked up by the wait below, so a burst cannot run cycles
            // faster than the backoff allows.
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }

            // Idle: wake on a trigger or when the periodic interval expires.
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    debug!("periodic refresh");
                }
                _ = self.trigger.notified() => {
                    debug!("refresh triggered");
                }
                _ = shutdown.changed() => break,
            }
        }

        info!("scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxscout_core::PrimaryIp;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_record(name: &str, address: &str) -> Record {
        Record {
            name: Some(name.to_string()),
            primary_ip: Some(PrimaryIp {
                address: address.to_string(),
            }),
            config_context: Some(serde_json::json!({"prom_targets": {"metrics": {}}})),
            ..Record::default()
        }
    }

    fn fetch_returning(records: Vec<Record>) -> FetchCallback {
        Box::new(move || {
            let records = records.clone();
            Box::pin(async move { Ok(records) })
        })
    }

    fn test_backoff() -> Backoff {
        Backoff::new(Duration::from_millis(1), Duration::from_millis(4))
    }

    #[tokio::test]
    async fn cycle_writes_derived_lists() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = Scheduler::new(
            fetch_returning(vec![test_record("a", "10.0.0.1/24")]),
            dir.path().to_path_buf(),
            Duration::from_secs(1800),
            test_backoff(),
        );

        let summary = scheduler.run_cycle().await.unwrap();
        assert_eq!(summary.written, vec!["metrics"]);
        assert!(dir.path().join("sd_metrics.json").exists());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = Scheduler::new(
            fetch_returning(vec![test_record("a", "10.0.0.1/24")]),
            dir.path().to_path_buf(),
            Duration::from_secs(1800),
            test_backoff(),
        );
        good.run_cycle().await.unwrap();

        let failing = Scheduler::new(
            Box::new(|| Box::pin(async { anyhow::bail!("inventory unreachable") })),
            dir.path().to_path_buf(),
            Duration::from_secs(1800),
            test_backoff(),
        );
        assert!(failing.run_cycle().await.is_err());

        // The previous cycle's output survives a dead inventory.
        assert!(dir.path().join("sd_metrics.json").exists());
    }

    #[tokio::test]
    async fn loop_runs_first_cycle_and_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetch: FetchCallback = Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Vec::new()) })
        });

        let mut scheduler = Scheduler::new(
            fetch,
            dir.path().to_path_buf(),
            Duration::from_secs(1800),
            test_backoff(),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            scheduler.run(shutdown_rx).await;
        });

        // Wait until the immediate first cycle has run.
        tokio::time::timeout(Duration::from_secs(5), async {
            while calls.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("first cycle did not run");

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn trigger_causes_a_follow_up_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetch: FetchCallback = Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Vec::new()) })
        });

        let mut scheduler = Scheduler::new(
            fetch,
            dir.path().to_path_buf(),
            // Long interval: only a trigger can start the second cycle.
            Duration::from_secs(1800),
            test_backoff(),
        );
        let trigger = scheduler.trigger();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            scheduler.run(shutdown_rx).await;
        });

        // Fire immediately; the permit is held across the first cycle and
        // its backoff gap, then consumed by the idle wait.
        trigger.notify_one();

        tokio::time::timeout(Duration::from_secs(5), async {
            while calls.load(Ordering::SeqCst) < 2 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("trigger did not cause a second cycle");

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
