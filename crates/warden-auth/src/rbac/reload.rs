//! Background policy reloads.
//!
//! Role and permission mutations commit first and then call
//! [`PolicyReloader::schedule`]. A single worker drains the queue and calls
//! [`PolicyEnforcer::load_policy`]; requests that pile up while a load is
//! running are merged into the next one.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use warden_core::error::AppError;

use super::enforcer::PolicyEnforcer;

/// A queued request to rebuild the policy model.
#[derive(Debug, Clone)]
struct ReloadRequest {
    reason: String,
}

/// What happened to a [`PolicyReloader::schedule`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A new reload was queued.
    Queued,
    /// The queue was full; a pending reload will cover this request.
    Coalesced,
    /// The worker has stopped.
    Closed,
}

/// Counters describing reload activity.
#[derive(Debug, Default)]
pub struct ReloadStats {
    queued: AtomicU64,
    coalesced: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl ReloadStats {
    /// Requests accepted into the queue.
    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    /// Requests folded into another pending or subsequent reload.
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }

    /// Reloads that replaced the model.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Reloads whose rule fetch failed.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Handle for scheduling asynchronous policy reloads.
#[derive(Debug, Clone)]
pub struct PolicyReloader {
    sender: mpsc::Sender<ReloadRequest>,
    stats: Arc<ReloadStats>,
}

impl PolicyReloader {
    /// Starts the reload worker.
    ///
    /// At most `queue_size` reloads wait behind the running one. The worker
    /// exits when `shutdown` turns `true` or every handle is dropped.
    pub fn spawn(
        enforcer: Arc<PolicyEnforcer>,
        queue_size: usize,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(queue_size.max(1));
        let stats = Arc::new(ReloadStats::default());

        let handle = tokio::spawn(run_worker(enforcer, receiver, stats.clone(), shutdown));

        (Self { sender, stats }, handle)
    }

    /// Requests a reload without waiting for it.
    pub fn schedule(&self, reason: impl Into<String>) -> ScheduleOutcome {
        let request = ReloadRequest {
            reason: reason.into(),
        };

        match self.sender.try_send(request) {
            Ok(()) => {
                self.stats.queued.fetch_add(1, Ordering::Relaxed);
                ScheduleOutcome::Queued
            }
            Err(mpsc::error::TrySendError::Full(request)) => {
                self.stats.coalesced.fetch_add(1, Ordering::Relaxed);
                debug!(reason = %request.reason, "Policy reload already pending, coalescing");
                ScheduleOutcome::Coalesced
            }
            Err(mpsc::error::TrySendError::Closed(request)) => {
                warn!(reason = %request.reason, "Policy reload worker stopped, request dropped");
                ScheduleOutcome::Closed
            }
        }
    }

    /// Runs a rule-changing mutation and, once it has committed, schedules a
    /// reload. The mutation's result is returned without waiting for the
    /// reload; a failed mutation schedules nothing.
    pub async fn after_commit<T, F>(&self, reason: &str, mutation: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let output = mutation.await?;
        self.schedule(reason);
        Ok(output)
    }

    /// Reload counters.
    pub fn stats(&self) -> &ReloadStats {
        &self.stats
    }
}

async fn run_worker(
    enforcer: Arc<PolicyEnforcer>,
    mut receiver: mpsc::Receiver<ReloadRequest>,
    stats: Arc<ReloadStats>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Policy reload worker started");

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("Policy reload worker received shutdown signal");
                    break;
                }
            }
            request = receiver.recv() => {
                let Some(request) = request else {
                    break;
                };

                // Anything queued behind this request is covered by the load below.
                let mut merged = 0u64;
                while receiver.try_recv().is_ok() {
                    merged += 1;
                }
                if merged > 0 {
                    stats.coalesced.fetch_add(merged, Ordering::Relaxed);
                }

                match enforcer.load_policy().await {
                    Ok(generation) => {
                        stats.completed.fetch_add(1, Ordering::Relaxed);
                        info!(generation, reason = %request.reason, merged, "Policy reloaded");
                    }
                    Err(e) => {
                        stats.failed.fetch_add(1, Ordering::Relaxed);
                        error!(reason = %request.reason, error = %e, "Policy reload failed");
                    }
                }
            }
        }
    }

    info!("Policy reload worker stopped");
}
