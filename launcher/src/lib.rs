//! Library entry for the `add_nodes` launcher.
//!
//! Bridges a process invocation to one run of the provisioning orchestrator:
//! the argument vector and the toolchain paths go in, a single task runs on a
//! caller-owned scheduler, and its outcome becomes the process exit status.
#![cfg_attr(
    test,
    expect(clippy::unwrap_used, reason = "Tests should fail loudly on unexpected errors")
)]

extern crate alloc;
extern crate core;

pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod paths;
pub mod scheduler;

use std::{env, ffi::OsString, process::ExitCode};

use tracing::{Instrument as _, debug};

pub use error::LaunchError;
pub use orchestrator::{ExternalOrchestrator, Orchestrator};
pub use paths::PathContext;
pub use scheduler::{CurrentThreadScheduler, Scheduler};

/// Exit status reported for any failed launch.
pub const FAILURE_STATUS: u8 = 1;

/// The launcher's main function; can be called from a shim binary.
///
/// Captures the argument vector, resolves the toolchain paths, runs the
/// external orchestrator on a fresh [`CurrentThreadScheduler`] and reports the outcome.
pub fn inner_main() -> ExitCode {
    logging::init();
    let arguments: Vec<OsString> = env::args_os().skip(1).collect();

    let outcome = PathContext::from_current_exe()
        .map_err(LaunchError::PathResolution)
        .and_then(|paths| {
            let scheduler = CurrentThreadScheduler::new()?;
            launch(scheduler, ExternalOrchestrator::default(), arguments, paths)
        });

    finish(outcome)
}

/// Runs one orchestration call to completion on `scheduler`.
///
/// The orchestrator receives `arguments` untouched together with the base path and
/// toolchain root from `paths`. Nothing is retried and no error is reinterpreted.
///
/// # Errors
///
/// Returns [`LaunchError::Orchestration`] carrying the orchestrator's report if it fails,
/// or [`LaunchError::TaskAborted`] if the task never produced an outcome.
pub fn launch<S, O>(
    scheduler: S,
    orchestrator: O,
    arguments: Vec<OsString>,
    paths: PathContext,
) -> Result<(), LaunchError>
where
    S: Scheduler,
    O: Orchestrator + 'static,
{
    let span = tracing::info_span!(
        "launch",
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        toolchain_root = ?paths.toolchain_root,
        base_path = ?paths.base_path,
    );
    debug!(parent: &span, "Submitting orchestration task with {} arguments", arguments.len());

    let PathContext {
        toolchain_root,
        base_path,
    } = paths;
    let task = async move {
        orchestrator
            .orchestrate(arguments, base_path, toolchain_root)
            .await
    }
    .instrument(span);

    scheduler.run(task)?.map_err(LaunchError::Orchestration)
}

/// Maps a launch outcome to the process exit status: `0` on success, [`FAILURE_STATUS`] otherwise.
pub const fn exit_status(outcome: &Result<(), LaunchError>) -> u8 {
    if outcome.is_ok() { 0 } else { FAILURE_STATUS }
}

/// Reports a failed outcome on stderr and converts it into an [`ExitCode`].
pub fn finish(outcome: Result<(), LaunchError>) -> ExitCode {
    let status = exit_status(&outcome);
    if let Err(error) = outcome {
        eprintln!("Error: {:?}", render(error));
    }
    ExitCode::from(status)
}

/// Converts a launch error into the report shown to the user.
///
/// Orchestration failures are shown exactly as the orchestrator produced them.
fn render(error: LaunchError) -> eyre::Report {
    match error {
        LaunchError::Orchestration(report) => report,
        other => eyre::Report::new(other),
    }
}
