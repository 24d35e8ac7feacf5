//! Console logging for the `idshard` binary.
//!
//! Events are printed through `tracing_subscriber::fmt` with local RFC 3339
//! timestamps. Verbosity follows `RUST_LOG` and defaults to `info`; use
//! `RUST_LOG=idshard=debug` to see every directory as it is created.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()
        .context("failed to install tracing subscriber")
}
