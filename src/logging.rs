//! Diagnostics on stderr via `tracing`.
//!
//! Stdout carries command output (result boxes, JSON documents, batch
//! summaries), so every event goes to stderr.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset or blank: our own progress at `info`,
/// dependencies only when they warn.
pub const DEFAULT_DIRECTIVES: &str = "warn,mammo_lingua=info";

/// Filter from an explicit directive string, falling back to
/// [`DEFAULT_DIRECTIVES`].
pub fn filter_from(directives: Option<&str>) -> Result<EnvFilter> {
    match directives.map(str::trim) {
        Some(custom) if !custom.is_empty() => EnvFilter::try_new(custom)
            .with_context(|| format!("invalid log directives `{custom}`")),
        _ => Ok(EnvFilter::new(DEFAULT_DIRECTIVES)),
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let directives = std::env::var("RUST_LOG").ok();
    let filter = filter_from(directives.as_deref())?;

    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("installing tracing subscriber")?;
    tracing::debug!(directives = ?directives, "tracing initialised");
    Ok(())
}
