//! Logging and latency output for the CLI.
//!
//! Uses `tracing` spans with automatic duration tracking via `FmtSpan::CLOSE`.
//! Command entry points carry `#[instrument]`, so `--timing` prints how long
//! each one took when its span closes.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Crates whose debug output drowns the console's own.
const NOISY_CRATES: &[&str] = &["hyper_util", "reqwest", "rustls"];

/// Initialize tracing subscriber with optional timing output.
///
/// # Arguments
/// * `verbose` - If true, enables debug-level logging
/// * `timing` - If true, logs span close events with duration
pub fn init_tracing(verbose: bool, timing: bool) {
    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(build_filter(default_level(verbose, timing), None))
        .init();
}

fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        // span close events are INFO
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// `RUST_LOG` (or `directives`, when given) on top of `level`, with HTTP
/// internals held at warn.
fn build_filter(level: LevelFilter, directives: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    let mut filter = match directives {
        Some(directives) => builder.parse_lossy(directives),
        None => builder.from_env_lossy(),
    };
    for name in NOISY_CRATES {
        if let Ok(directive) = format!("{name}=warn").parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}
