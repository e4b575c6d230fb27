use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Compact, timestamp-free events on stderr; stdout carries `--stdout` output.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` picks debug over info.
pub fn init_logging(verbose: bool) {
    let directive = if verbose { "feed_llm=debug" } else { "feed_llm=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
