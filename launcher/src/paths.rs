//! Resolution of the toolchain's own installation paths.
//!
//! Both values are computed once at startup from the location of the running
//! executable and then handed to the orchestration routine by value.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

/// The two filesystem roots the provisioning workflow locates its resources from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    /// Root of the installed toolchain distribution.
    pub toolchain_root: PathBuf,
    /// Directory holding the executable and the resources shipped next to it.
    pub base_path: PathBuf,
}

impl PathContext {
    pub const fn new(toolchain_root: PathBuf, base_path: PathBuf) -> Self {
        Self {
            toolchain_root,
            base_path,
        }
    }

    /// Resolves the context from the currently running executable, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable path cannot be determined or canonicalized,
    /// or if it has no parent directory.
    pub fn from_current_exe() -> io::Result<Self> {
        let executable = fs::canonicalize(env::current_exe()?)?;
        Self::from_executable(&executable)
    }

    /// Derives the context from an executable path.
    ///
    /// The base path is the executable's directory; the toolchain root sits one level
    /// above it (the distribution root above `bin/`). A base path without a parent is
    /// its own toolchain root.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] if `executable` has no parent directory.
    pub fn from_executable(executable: &Path) -> io::Result<Self> {
        let base_path = executable
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Executable path has no parent directory: {}", executable.display()),
                )
            })?;
        let toolchain_root = base_path.parent().unwrap_or(base_path);

        Ok(Self::new(toolchain_root.to_path_buf(), base_path.to_path_buf()))
    }
}
