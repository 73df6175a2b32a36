use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Install a test logger once per test binary. `RUST_LOG` overrides the
/// default level.
pub fn init_test_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();
        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("rh_hashmap", LevelFilter::Debug)
            .is_test(true)
            .parse_default_env();
        let _ = builder.try_init();
    });
}
