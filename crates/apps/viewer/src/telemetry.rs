use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Filtering follows `RUST_LOG`; output goes
/// to stderr so stdout stays machine-readable.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
