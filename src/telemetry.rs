//! Tracing subscriber setup shared by the binaries

use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber writing to stdout.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(logging: &LoggingConfig) {
    install(logging, std::io::stdout);
}

/// Same as [`init`], but keeps stdout free for program output
pub fn init_stderr(logging: &LoggingConfig) {
    install(logging, std::io::stderr);
}

fn install<W>(logging: &LoggingConfig, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);

    match logging.format.as_str() {
        "pretty" | "text" => registry.with(fmt::layer().with_writer(writer)).init(),
        _ => registry.with(fmt::layer().json().with_writer(writer)).init(),
    }
}
