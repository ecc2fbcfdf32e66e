use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::LogFormat;

/// Installs the global subscriber writing to stderr. `RUST_LOG` takes
/// precedence over `verbose`.
pub fn init_tracing(verbose: bool, format: LogFormat) {
    let default = if verbose { "bigsky=debug" } else { "bigsky=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    let text = (format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let json = (format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry().with(filter).with(text).with(json).init();
}
