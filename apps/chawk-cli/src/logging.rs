use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

const CHAWK_TARGETS: [&str; 4] = ["chawk", "chawk_users", "chawk_auth", "chawk_http"];

/// Install the global subscriber. Logs go to stderr; stdout carries results.
///
/// `RUST_LOG` wins; otherwise `-v`/`-vv`/`-vvv` select info/debug/trace for
/// the chawk crates, falling back to `logging.level`.
pub fn init(config: &LoggingConfig, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(level_for(config, verbose))));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .init(),
    }
}

fn level_for(config: &LoggingConfig, verbose: u8) -> &str {
    match verbose {
        0 => config.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn directives(level: &str) -> String {
    let mut out = String::from("warn");
    for target in CHAWK_TARGETS {
        out.push(',');
        out.push_str(target);
        out.push('=');
        out.push_str(level);
    }
    out
}
