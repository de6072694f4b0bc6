//! The event loop that drives the single launch task.
//!
//! The scheduler is owned by the caller and follows a fixed lifecycle:
//! `create → run(single_task) → shutdown`. [`Scheduler::run`] consumes the
//! scheduler, so a launch can only ever happen once per instance.
//!
//! Work the task spawns, locally or with [`tokio::spawn`], is drained before
//! [`Scheduler::run`] returns.

use core::{future::Future, time::Duration};

use tokio::{
    runtime::{Builder, Runtime},
    task::LocalSet,
    time,
};
use tracing::debug;

use crate::error::LaunchError;

/// How long shutdown waits for threads of the blocking pool (`spawn_blocking`, `tokio::fs`).
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Polling interval while waiting for spawned runtime tasks to finish.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Runs exactly one task to a terminal state.
pub trait Scheduler {
    /// Drives `task` (and anything it schedules) to completion, then shuts down.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::TaskAborted`] if the task panicked or was cancelled.
    fn run<F>(self, task: F) -> Result<F::Output, LaunchError>
    where
        F: Future + 'static,
        F::Output: 'static;
}

/// Single-threaded cooperative scheduler backed by a tokio current-thread runtime.
///
/// The task runs on a [`LocalSet`], so neither it nor the work it spawns with
/// [`tokio::task::spawn_local`] has to be `Send`.
#[derive(Debug)]
pub struct CurrentThreadScheduler {
    runtime: Runtime,
}

impl CurrentThreadScheduler {
    /// # Errors
    ///
    /// Returns [`LaunchError::Scheduler`] if the runtime's I/O or time drivers cannot be created.
    pub fn new() -> Result<Self, LaunchError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(LaunchError::Scheduler)?;
        Ok(Self { runtime })
    }
}

impl Scheduler for CurrentThreadScheduler {
    fn run<F>(self, task: F) -> Result<F::Output, LaunchError>
    where
        F: Future + 'static,
        F::Output: 'static,
    {
        let Self { runtime } = self;

        let local = LocalSet::new();
        let handle = local.spawn_local(task);
        // Awaiting the set itself only resolves once every local task has drained.
        runtime.block_on(local);
        let output = runtime.block_on(handle);

        // Tasks started with `tokio::spawn` live outside the set.
        let metrics = runtime.metrics();
        runtime.block_on(async {
            while metrics.num_alive_tasks() > 0 {
                time::sleep(IDLE_POLL).await;
            }
        });

        debug!("Launch task finished, shutting down scheduler");
        runtime.shutdown_timeout(SHUTDOWN_GRACE);

        output.map_err(LaunchError::TaskAborted)
    }
}
