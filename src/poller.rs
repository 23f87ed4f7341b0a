//! Scheduled repeat of the collect-and-render cycle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Poller                             │
//! │                                                              │
//! │  start() ──► spawn loop ──► run_cycle() ──► sleep(interval)  │
//! │                  ▲                               │           │
//! │                  └───────────────────────────────┘           │
//! │                                                              │
//! │  stop()  ──► shutdown (watch) ──► loop exits after the       │
//! │                                   in-flight cycle            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The next wait is only armed after a cycle returns, so two cycles never
//! overlap no matter how slow one is. A loop started after `stop()` first
//! awaits the previous loop, so a restart cannot overlap a leftover cycle
//! either, and [`Poller::wait`] covers both. A cycle error is reported to
//! the observer and the loop carries on.
//!
//! Dropping a [`Poller`] drops its shutdown sender, which also ends the loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::observer::{MonitorObserver, TracingObserver};

/// Default delay between cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// One unit of scheduled work.
#[async_trait]
pub trait PollCycle: Send + Sync + 'static {
    /// Run one collect-and-render cycle.
    async fn run_cycle(&self) -> Result<(), AppError>;
}

/// Scheduler state owned by one poller.
#[derive(Debug, Default)]
struct PollState {
    polling: bool,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

/// Runs a [`PollCycle`] on a fixed interval until stopped.
pub struct Poller<C> {
    cycle: Arc<C>,
    observer: Arc<dyn MonitorObserver>,
    interval_ms: Arc<AtomicU64>,
    state: PollState,
}

impl<C: PollCycle> Poller<C> {
    /// Create an idle poller that logs through `tracing`.
    #[must_use]
    pub fn new(cycle: C, interval: Duration) -> Self {
        Self::with_observer(Arc::new(cycle), interval, Arc::new(TracingObserver))
    }

    /// Create an idle poller with a custom observer.
    #[must_use]
    pub fn with_observer(
        cycle: Arc<C>,
        interval: Duration,
        observer: Arc<dyn MonitorObserver>,
    ) -> Self {
        Self {
            cycle,
            observer,
            interval_ms: Arc::new(AtomicU64::new(millis(interval))),
            state: PollState::default(),
        }
    }

    /// Whether the poller is in the polling state.
    #[must_use]
    pub const fn is_polling(&self) -> bool {
        self.state.polling
    }

    /// Delay used for the next wait.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.load(Ordering::SeqCst))
    }

    /// Start polling. The first cycle runs immediately.
    ///
    /// Returns `false` without doing anything if already polling.
    pub fn start(&mut self) -> bool {
        if self.state.polling {
            self.observer.polling_already_running();
            return false;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.cycle),
            Arc::clone(&self.observer),
            Arc::clone(&self.interval_ms),
            self.state.task.take(),
            shutdown_rx,
        ));

        self.state = PollState {
            polling: true,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        };
        self.observer.polling_started(self.interval());
        true
    }

    /// Stop polling. A cycle already running is allowed to finish but no
    /// further cycle starts.
    ///
    /// Returns `false` without doing anything if idle.
    pub fn stop(&mut self) -> bool {
        if !self.state.polling {
            self.observer.polling_not_running();
            return false;
        }

        self.state.polling = false;
        if let Some(shutdown) = self.state.shutdown.take() {
            // The loop may already be gone; nothing to signal then.
            let _ = shutdown.send(true);
        }
        self.observer.polling_stopped();
        true
    }

    /// Change the delay between cycles.
    ///
    /// A wait already in progress keeps its old delay.
    pub fn set_interval(&self, interval: Duration) {
        self.interval_ms.store(millis(interval), Ordering::SeqCst);
        self.observer.interval_updated(interval, self.state.polling);
    }

    /// Wait for the polling task to exit, including any loop it replaced.
    /// Returns at once if none was started.
    pub async fn wait(&mut self) {
        if let Some(task) = self.state.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Polling task terminated abnormally");
            }
        }
    }
}

async fn poll_loop<C: PollCycle>(
    cycle: Arc<C>,
    observer: Arc<dyn MonitorObserver>,
    interval_ms: Arc<AtomicU64>,
    previous: Option<JoinHandle<()>>,
    mut shutdown: watch::Receiver<bool>,
) {
    if let Some(previous) = previous {
        if let Err(e) = previous.await {
            tracing::error!(error = %e, "Previous polling task terminated abnormally");
        }
    }

    loop {
        if *shutdown.borrow() {
            break;
        }
        if let Err(e) = cycle.run_cycle().await {
            observer.cycle_failed(&e);
        }

        if *shutdown.borrow() {
            break;
        }

        let delay = Duration::from_millis(interval_ms.load(Ordering::SeqCst));
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    tracing::debug!("Polling loop exited");
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
