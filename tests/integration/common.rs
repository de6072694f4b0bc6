//! Common utilities for integration tests.
//!
//! Builds a throwaway toolchain layout (`<root>/bin/add_nodes` next to a scripted
//! `provision-orchestrator`) and runs the launcher binary from inside it.

use std::{
    ffi::OsStr,
    fs,
    os::unix::fs::PermissionsExt as _,
    path::{Path, PathBuf},
    process::{Command, Output},
    sync::{Mutex, MutexGuard, PoisonError},
};

use tempfile::TempDir;

/// Writing executables while another test thread forks can fail with `ETXTBSY`,
/// so installs and spawns are serialized.
static EXEC_LOCK: Mutex<()> = Mutex::new(());

pub fn exec_lock() -> MutexGuard<'static, ()> {
    EXEC_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

fn get_launcher_bin() -> &'static str {
    env!("CARGO_BIN_EXE_add_nodes")
}

/// Orchestrator stand-in: records its argv, environment and invocation count,
/// optionally sleeps, then exits with `$ORCHESTRATOR_EXIT` (default 0).
const ORCHESTRATOR_SCRIPT: &str = r#"#!/bin/sh
state="$PROVISION_BASE_PATH/state"
mkdir -p "$state"
echo call >> "$state/calls"
: > "$state/args"
for arg in "$@"; do
    printf '%s\n' "$arg" >> "$state/args"
done
printf '%s\n' "$PROVISION_TOOLCHAIN_ROOT" > "$state/toolchain_root"
printf '%s\n' "$PROVISION_BASE_PATH" > "$state/base_path"
if [ -n "$ORCHESTRATOR_DELAY" ]; then
    sleep "$ORCHESTRATOR_DELAY"
    echo finished > "$state/finished"
fi
if [ -n "$ORCHESTRATOR_MESSAGE" ]; then
    echo "$ORCHESTRATOR_MESSAGE" >&2
fi
exit "${ORCHESTRATOR_EXIT:-0}"
"#;

/// A toolchain installed into a temporary directory.
pub struct Toolchain {
    root: TempDir,
}

impl Toolchain {
    /// Installs the launcher, and the scripted orchestrator if `with_orchestrator` is set.
    pub fn install(with_orchestrator: bool) -> Self {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        let bin = root.path().join("bin");
        fs::create_dir(&bin).expect("failed to create bin dir");

        fs::copy(get_launcher_bin(), bin.join("add_nodes")).expect("failed to copy launcher");

        if with_orchestrator {
            let script = bin.join("provision-orchestrator");
            fs::write(&script, ORCHESTRATOR_SCRIPT).expect("failed to write orchestrator");
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
                .expect("failed to make orchestrator executable");
        }

        Self { root }
    }

    /// Canonical toolchain root, as the launcher resolves it.
    pub fn root(&self) -> PathBuf {
        fs::canonicalize(self.root.path()).expect("failed to canonicalize root")
    }

    pub fn bin(&self) -> PathBuf {
        self.root().join("bin")
    }

    /// Runs `add_nodes` with `args` and extra environment, waiting for it to exit.
    pub fn run(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
        self.run_os(&args, envs)
    }

    /// Like [`Toolchain::run`], for arguments that need not be UTF-8.
    pub fn run_os(&self, args: &[&OsStr], envs: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(self.bin().join("add_nodes"));
        for &(key, value) in envs {
            cmd.env(key, value);
        }
        cmd.args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run add_nodes")
    }

    fn state_file(&self, name: &str) -> PathBuf {
        self.bin().join("state").join(name)
    }

    /// Lines of a state file written by the orchestrator, or `None` if it was never written.
    pub fn read_lines(&self, name: &str) -> Option<Vec<String>> {
        read_lines(&self.state_file(name))
    }

    /// Raw contents of a state file written by the orchestrator.
    pub fn read_bytes(&self, name: &str) -> Option<Vec<u8>> {
        fs::read(self.state_file(name)).ok()
    }

    /// Number of times the orchestrator has been invoked.
    pub fn call_count(&self) -> usize {
        self.read_lines("calls").map_or(0, |lines| lines.len())
    }
}

fn read_lines(path: &Path) -> Option<Vec<String>> {
    let content = fs::read_to_string(path).ok()?;
    Some(content.lines().map(str::to_owned).collect())
}
