//! Logging setup for the command line

use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "fintrack";

/// HTTP stack targets, capped at WARN even when verbose.
const HTTP_TARGETS: [&str; 3] = ["reqwest", "hyper_util", "rustls"];

fn app_targets(verbose: bool) -> Targets {
    let (app_level, http_level) = if verbose {
        (LevelFilter::DEBUG, LevelFilter::WARN)
    } else {
        (LevelFilter::OFF, LevelFilter::OFF)
    };
    HTTP_TARGETS
        .iter()
        .fold(Targets::new().with_target(APP_TARGET, app_level), |targets, t| {
            targets.with_target(*t, http_level)
        })
}

/// Installs the global subscriber. Logs go to stderr so tables printed on
/// stdout stay clean. `RUST_LOG` narrows what `verbose` enables.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "off" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_targets(verbose))
        .with(env_filter)
        .try_init();
    if installed.is_err() {
        debug!("Global subscriber already installed");
    }
}
