//! Opt-in `tracing` setup for hosts that do not install their own subscriber.
//!
//! Break recomputes and layout passes log at `debug`, clamped positions and
//! culled items at `trace`, rejected updates at `warn`.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "chart_axis=warn";

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// `fallback_filter` (or [`DEFAULT_FILTER`]).
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_tracing(fallback_filter: Option<&str>) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let fallback = fallback_filter.unwrap_or(DEFAULT_FILTER);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}

/// [`init_tracing`] with [`DEFAULT_FILTER`].
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(None)
}
