//! Environment overrides on top of `rime.toml`.
//!
//! Kept as the only test in this binary: it mutates process environment.

use std::env;

use rime_core::config::CONFIG_FILE;
use rime_core::{CompilerConfig, load_config, resolve_config};

fn set(key: &str, value: &str) {
    // SAFETY: no other thread of this test binary reads the environment.
    unsafe { env::set_var(key, value) };
}

fn unset(key: &str) {
    // SAFETY: as in `set`.
    unsafe { env::remove_var(key) };
}

#[test]
fn environment_overrides_file_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "verbose = true\ndebug = false\nsupported_version = 3\n",
    )
    .expect("write");

    unset("RIME_VERBOSE");
    unset("RIME_DEBUG");
    let from_file = resolve_config(dir.path()).expect("load");
    assert_eq!(from_file, load_config(dir.path()).expect("load"));

    set("RIME_VERBOSE", "off");
    set("RIME_DEBUG", "true");
    let overridden = resolve_config(dir.path()).expect("load");
    assert!(!overridden.verbose);
    assert!(overridden.debug);
    assert_eq!(overridden.supported_version, 3, "file values survive");

    set("RIME_VERBOSE", "sometimes");
    let config = CompilerConfig::default().apply_env();
    assert!(!config.verbose, "unparseable value keeps the default");
    assert!(config.debug);

    unset("RIME_VERBOSE");
    unset("RIME_DEBUG");
}
