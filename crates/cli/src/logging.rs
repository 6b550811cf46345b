//! tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Logs go to stderr so `reverseai prompt` output stays pipeable.
pub(crate) fn init_logger(verbose: bool) {
    let default = if verbose {
        "reverseai=debug,reverseai_core=debug,tower_http=debug,info"
    } else {
        "reverseai=info,reverseai_core=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
