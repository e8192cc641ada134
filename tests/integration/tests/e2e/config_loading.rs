//! Configuration loading tests.

use fedsec_core::config::Config;
use fedsec_integration_tests::{TestEnv, T0};
use fedsec_storage::StorageService;

/// A configuration file drives storage limits and replay policy.
#[test]
fn test_config_file_drives_environment() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fedsec.toml");
    std::fs::write(
        &path,
        r#"
[storage]
key_size = 300
cleanup_interval_secs = 60

[replay]
strict = false

[trust]
max_path_depth = 3
"#,
    )?;

    let config = Config::load(&path)?;
    assert_eq!(config.storage.key_size, 300);
    assert!(!config.replay.strict);
    assert_eq!(config.trust.max_path_depth, 3);

    let env = TestEnv::with_config(config);
    assert!(!env.replay.is_strict());
    assert_eq!(env.storage.capabilities().key_size, 300);
    assert!(env.replay.check("ctx", &"k".repeat(400), T0 + 1_000));

    Ok(())
}

/// Saved configuration loads back unchanged.
#[test]
fn test_config_save_and_reload() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fedsec.toml");

    let config = Config::for_testing();
    config.save(&path)?;
    assert_eq!(Config::load(&path)?, config);

    Ok(())
}
