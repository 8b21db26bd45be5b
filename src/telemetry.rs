//! Opt-in `tracing` subscriber for hosts that do not bring their own.
//!
//! Events this crate emits, by target:
//!
//! - `series_geometry::api::data_controller` logs series registration, disposal
//!   and sample replacement at `debug`.
//! - `series_geometry::api::layout_pass` logs a pass summary at `debug` and
//!   series whose build failed at `warn`.
//! - `series_geometry::api::series_config` logs every clamped or ignored
//!   configuration value at `warn`.
//! - `series_geometry::api::segment_builder` logs per-build reuse counts at
//!   `trace`.
//! - `series_geometry::core::stacking` logs group recomputation at `debug`
//!   and cache hits at `trace`.
//! - `series_geometry::core::circular` logs the eccentric center correction
//!   at `trace`.

/// Filter used when `RUST_LOG` is unset or invalid: this crate at `debug`,
/// everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,series_geometry=debug";

/// Installs a compact subscriber filtered by `RUST_LOG` or [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is off or the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
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
        false
    }
}

#[cfg(all(test, feature = "telemetry"))]
mod tests {
    use super::DEFAULT_FILTER;

    #[test]
    fn default_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
