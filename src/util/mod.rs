//! Utility module
//!
//! Process-wide tracing setup shared by binaries and tests.

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber with env-based filtering
///
/// Safe to call more than once; later calls are no-ops, which lets every
/// test set up logging independently.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
