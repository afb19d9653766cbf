//! Tracing setup
//!
//! Logs go to stderr so the report on stdout stays clean.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once
///
/// `RUST_LOG` directives are honored; without them this crate logs at
/// info. `verbose` raises this crate to debug either way.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        let crate_level = match (verbose, std::env::var_os(EnvFilter::DEFAULT_ENV)) {
            (true, _) => Some("debug"),
            (false, None) => Some("info"),
            (false, Some(_)) => None,
        };
        if let Some(level) = crate_level {
            if let Ok(directive) = format!("family_budget={}", level).parse() {
                filter = filter.add_directive(directive);
            }
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing(false);
        init_tracing(true);
        tracing::info!("still fine");
    }
}
