// SPDX-License-Identifier: GPL-3.0-only

use tracing_subscriber::EnvFilter;

use crate::config::LoggingLevel;

fn env_filter(level: LoggingLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Install a stderr subscriber; `RUST_LOG` wins over `level`.
///
/// Returns false when a global subscriber was already installed.
pub fn init(level: LoggingLevel) -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(env_filter(level))
        .try_init()
        .is_ok()
}
