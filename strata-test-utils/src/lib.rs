//! Test helpers shared by strata crates.
//!
//! Log output of test binaries is filtered by `STRATA_TEST_LOG` when set,
//! falling back to `RUST_LOG` and then to `info`.

use std::sync::Once;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Filter variable consulted before `RUST_LOG`.
pub const TEST_LOG_ENV: &str = "STRATA_TEST_LOG";

const DEFAULT_FILTER: &str = "info";

fn test_filter() -> EnvFilter {
    [TEST_LOG_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .find_map(|key| std::env::var(key).ok())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a `tracing` subscriber writing through the test harness's
/// captured output. Safe to call from every test; only the first call in a
/// binary installs anything.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(test_filter())
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

/// Whether [`init_tracing_for_tests`] has run in this binary.
pub fn tracing_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(feature = "auto-init")]
mod auto {
    // Runs at binary init time so individual tests need not call init.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_tracing_for_tests();
        init_tracing_for_tests();
        assert!(tracing_initialized());
        tracing::info!("test subscriber installed");
    }
}
