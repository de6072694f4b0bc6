//! Error type for the launcher boundary.

use std::io;

use thiserror::Error as ThisError;
use tokio::task::JoinError;

/// Everything that can stop a launch from reaching a successful outcome.
///
/// Only [`LaunchError::Orchestration`] originates in the provisioning workflow itself;
/// the other variants describe the bridge failing before or around it.
#[derive(Debug, ThisError)]
pub enum LaunchError {
    #[error("Failed to resolve the toolchain location")]
    PathResolution(#[source] io::Error),
    #[error("Failed to create the scheduler")]
    Scheduler(#[source] io::Error),
    /// The orchestration routine failed; its report is passed through untouched.
    #[error(transparent)]
    Orchestration(eyre::Report),
    #[error("Orchestration task aborted before completing")]
    TaskAborted(#[source] JoinError),
}
