//! Diagnostic output for the launcher.
//!
//! Logs go to stderr so that stdout belongs to the orchestrator. The default
//! filter only lets warnings through, which keeps a successful run silent;
//! `RUST_LOG` overrides it.

use core::str::FromStr;
use std::{env, io, sync::Once};

use thiserror::Error as ThisError;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "ADD_NODES_LOG_FORMAT";

const DEFAULT_LEVEL: &str = "warn";

static INIT_TRACING: Once = Once::new();

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// A log format name that is none of `compact`, `pretty` or `json`.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown log format '{0}'")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(UnknownLogFormat(other.to_owned())),
        }
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init() {
    INIT_TRACING.call_once(|| {
        let (format, rejected) = match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => match raw.parse::<LogFormat>() {
                Ok(format) => (format, None),
                Err(e) => (LogFormat::default(), Some(e)),
            },
            Err(_) => (LogFormat::default(), None),
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
            )
            .with_writer(io::stderr)
            .with_timer(ChronoLocal::rfc_3339());

        match format {
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Json => builder.json().init(),
            LogFormat::Pretty => builder.pretty().init(),
        }

        if let Some(reason) = rejected {
            warn!("Ignoring {LOG_FORMAT_ENV}: {reason}, using compact output");
        }
    });
}
