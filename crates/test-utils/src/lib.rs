pub mod builders;
pub mod fake_transpiler;

use std::path::Path;
use std::sync::{Arc, Once};

use modgen::config::ConfigFile;
use modgen::fs::FileSystem;
use modgen::generate::Generator;
use modgen::rules::RuleSet;
use tracing_subscriber::{fmt, EnvFilter};

pub use builders::{ConfigFileBuilder, RuleConfigBuilder};
pub use fake_transpiler::FakeTranspiler;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Build a generator over `fs` with a [`FakeTranspiler`].
pub fn fake_generator(
    root: impl AsRef<Path>,
    cfg: &ConfigFile,
    fs: Arc<dyn FileSystem>,
    transpiler: FakeTranspiler,
) -> Generator<FakeTranspiler> {
    let rules = RuleSet::from_config(root.as_ref(), cfg).expect("rules should compile");
    Generator::new(rules, fs, transpiler)
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
