use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a global subscriber so that `RUST_LOG=kv_skiplist=trace` shows
/// the engine's events while running tests.  Safe to call from every test.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();
}
