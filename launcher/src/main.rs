//! Shim binary that calls into the `provision_launcher` library's `inner_main`.
//!
//! Usage: `add_nodes [args...]`. Every argument is forwarded to the provisioning
//! orchestrator verbatim; the exit status is `0` on success and `1` on any failure.

use std::process::ExitCode;

fn main() -> ExitCode {
    provision_launcher::inner_main()
}
