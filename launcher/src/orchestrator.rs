//! The contract with the provisioning orchestration routine.
//!
//! The routine itself (machine creation, configuration, cluster registration)
//! lives outside this crate. [`ExternalOrchestrator`] is the binding the
//! `add_nodes` binary uses: it hands the invocation to the orchestrator
//! executable shipped alongside it in the toolchain.

use core::future::Future;
use std::{
    env::consts::EXE_SUFFIX,
    ffi::OsString,
    path::{Path, PathBuf},
};

use eyre::{WrapErr as _, eyre};
use tokio::process::Command;
use tracing::{debug, info};

/// File name (without platform suffix) of the orchestrator shipped in the base path.
pub const ORCHESTRATOR_PROGRAM: &str = "provision-orchestrator";

/// Environment variable carrying the toolchain root to the orchestrator process.
pub const TOOLCHAIN_ROOT_ENV: &str = "PROVISION_TOOLCHAIN_ROOT";
/// Environment variable carrying the secondary base path to the orchestrator process.
pub const BASE_PATH_ENV: &str = "PROVISION_BASE_PATH";

/// An asynchronous routine that creates the requested nodes and adds them to the cluster.
pub trait Orchestrator {
    /// Runs the provisioning workflow for one invocation.
    ///
    /// `arguments` is the process argument vector, program name excluded and unmodified.
    ///
    /// # Errors
    ///
    /// Any failure of the workflow; it is reported to the user as-is.
    fn orchestrate(
        &self,
        arguments: Vec<OsString>,
        base_path: PathBuf,
        toolchain_root: PathBuf,
    ) -> impl Future<Output = eyre::Result<()>>;
}

/// Delegates provisioning to the orchestrator executable located in the base path.
#[derive(Debug, Clone)]
pub struct ExternalOrchestrator {
    program: OsString,
}

impl Default for ExternalOrchestrator {
    fn default() -> Self {
        Self::with_program(format!("{ORCHESTRATOR_PROGRAM}{EXE_SUFFIX}"))
    }
}

impl ExternalOrchestrator {
    /// Uses `program` (a file name resolved against the base path) instead of the default.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Full path of the orchestrator executable for a given base path.
    pub fn program_path(&self, base_path: &Path) -> PathBuf {
        base_path.join(&self.program)
    }
}

impl Orchestrator for ExternalOrchestrator {
    #[tracing::instrument(skip_all, fields(program = ?self.program, args = arguments.len()))]
    async fn orchestrate(
        &self,
        arguments: Vec<OsString>,
        base_path: PathBuf,
        toolchain_root: PathBuf,
    ) -> eyre::Result<()> {
        let program = self.program_path(&base_path);
        debug!("Spawning orchestrator {}", program.display());

        let status = Command::new(&program)
            .args(&arguments)
            .env(TOOLCHAIN_ROOT_ENV, &toolchain_root)
            .env(BASE_PATH_ENV, &base_path)
            .status()
            .await
            .wrap_err(format!(
                "Failed to launch orchestrator at {}",
                program.display()
            ))?;

        if !status.success() {
            return Err(eyre!(
                "Orchestrator {} exited with {status}",
                program.display()
            ));
        }

        info!("Orchestrator completed");
        Ok(())
    }
}
