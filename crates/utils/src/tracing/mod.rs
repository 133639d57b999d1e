use dsec_core::constants::DSEC_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level, Span};

const DEFAULT_FILTER: &str = "info";

/// Initialize the tracing system
///
/// The filter is read from `DSEC_LOG` and falls back to `info`. Output goes
/// to stderr so that command output on stdout stays clean.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Install a subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_test_writer()
        .try_init();
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(DSEC_LOG_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Span covering one authorization decision on a resource
pub fn authorization_span(resource: &str, flags: u64) -> Span {
    span!(Level::INFO, "authorize", resource = %resource, flags)
}

/// Span covering one transport call
pub fn drpc_span(module: i32, method: i32) -> Span {
    span!(Level::DEBUG, "drpc", module = %module, method = %method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_can_be_entered() {
        init_for_tests();
        let outer = authorization_span("pool", 0x1);
        let _outer = outer.enter();
        let inner = drpc_span(4, 401);
        let _inner = inner.enter();
        debug!("inside both spans");
    }

    #[test]
    fn test_init_for_tests_is_repeatable() {
        init_for_tests();
        init_for_tests();
    }
}
