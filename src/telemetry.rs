//! `tracing` setup for hosts embedding `tanglism-chart`.
//!
//! The crate emits events under the `tanglism_chart` target: `debug!` for
//! replacements, invalidations and dropped responses, `trace!` for per-layer
//! and per-segment detail, `warn!` for fetch and painter failures.

/// Directives used when `RUST_LOG` is unset or empty.
pub const DEFAULT_FILTER: &str = "tanglism_chart=debug,warn";

/// Filter directives for the default subscriber: `RUST_LOG` when it holds
/// anything, otherwise [`DEFAULT_FILTER`].
#[must_use]
pub fn filter_directives(rust_log: Option<&str>) -> &str {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives,
        _ => DEFAULT_FILTER,
    }
}

/// Installs a compact subscriber filtered by [`filter_directives`].
///
/// `false` means nothing was installed: the `telemetry` feature is off, or
/// the host already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let rust_log = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
        let filter = tracing_subscriber::EnvFilter::try_new(filter_directives(rust_log.as_deref()))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_FILTER, filter_directives};

    #[test]
    fn blank_rust_log_falls_back_to_crate_filter() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("  ")), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("tanglism_chart=trace")), "tanglism_chart=trace");
    }

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn tracing_init_is_inert_without_feature() {
        assert!(!super::init_default_tracing());
    }
}
