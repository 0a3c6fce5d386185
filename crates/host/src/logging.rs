//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use gnomebot_core::CoreConfig;

/// Filter implied by `config`, falling back to `info`
///
/// The flag is `true` when the configured directive did not parse.
fn build_filter(config: &CoreConfig) -> (EnvFilter, bool) {
    match EnvFilter::try_new(config.log_directive()) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new("info"), true),
    }
}

/// Install the global fmt subscriber using the filter implied by `config`
///
/// Falls back to `info` when the configured directive does not parse.
/// Returns `false` if a global subscriber was already installed, which is
/// not an error: repeated startups in one process share the first one.
pub fn init_logging(config: &CoreConfig) -> bool {
    let (filter, invalid) = build_filter(config);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if invalid {
        tracing::warn!(
            "Invalid log filter '{}', using 'info'",
            config.log_directive()
        );
    }
    installed
}
