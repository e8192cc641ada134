//! Storage and replay detection tests.

use std::sync::Arc;
use std::time::Duration;

use fedsec_integration_tests::{TestEnv, T0};
use fedsec_storage::{StorageError, StorageService};

/// Versioned session lifecycle through read-if-newer polling.
#[test]
fn test_versioned_session_lifecycle() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let storage = &env.storage;

    assert!(storage.create("sessions", "abc123", "payload-v1", Some(T0 + 3_600_000))?);

    let record = storage.read("sessions", "abc123")?.expect("record stored");
    assert_eq!(record.version, 1);
    assert_eq!(record.value, "payload-v1");

    let version = storage.update_with_version(1, "sessions", "abc123", "payload-v2", Some(T0 + 7_200_000))?;
    assert_eq!(version, Some(2));

    let (version, record) = storage.read_if_newer("sessions", "abc123", 2)?;
    assert_eq!(version, Some(2));
    assert!(record.is_none());

    let (version, record) = storage.read_if_newer("sessions", "abc123", 1)?;
    assert_eq!(version, Some(2));
    assert_eq!(record.map(|r| r.value).as_deref(), Some("payload-v2"));

    Ok(())
}

/// Two writers racing on the same version: exactly one wins.
#[test]
fn test_optimistic_concurrency_conflict() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let storage = &env.storage;
    storage.create("sessions", "s1", "v1", None)?;

    assert_eq!(storage.update_with_version(1, "sessions", "s1", "alice", None)?, Some(2));
    match storage.update_with_version(1, "sessions", "s1", "bob", None) {
        Err(StorageError::VersionMismatch { expected, actual }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected version mismatch, got {other:?}"),
    }

    let record = storage.read("sessions", "s1")?.expect("record stored");
    assert_eq!(record.value, "alice");
    Ok(())
}

/// Records disappear at their expiration and the reaper reclaims them.
#[test]
fn test_expiration_and_reaping() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let storage = &env.storage;

    storage.create("sessions", "short", "x", Some(T0 + 1_000))?;
    storage.create("sessions", "long", "y", Some(T0 + 60_000))?;

    env.clock.advance(Duration::from_secs(1));
    assert!(storage.read("sessions", "short")?.is_none());
    assert!(storage.read("sessions", "long")?.is_some());

    assert_eq!(storage.reap("sessions")?, 1);
    assert_eq!(storage.stored_len("sessions"), 1);

    // An expired key can be created again.
    env.clock.advance(Duration::from_secs(60));
    assert!(storage.create("sessions", "long", "z", None)?);
    Ok(())
}

/// Message IDs are one-time-use within their validity window.
#[test]
fn test_replay_detection() {
    let env = TestEnv::new();
    let expires = T0 + 300_000;

    assert!(env.replay.check("saml2:sso", "_a75adf55-01d7-40cc-929f-dbd8372ebdfc", expires));
    assert!(!env.replay.check("saml2:sso", "_a75adf55-01d7-40cc-929f-dbd8372ebdfc", expires));

    // Same ID in another context is independent.
    assert!(env.replay.check("saml2:slo", "_a75adf55-01d7-40cc-929f-dbd8372ebdfc", expires));

    env.clock.set(expires);
    assert!(env.replay.check("saml2:sso", "_a75adf55-01d7-40cc-929f-dbd8372ebdfc", expires + 300_000));
}

/// The background cleanup task reaps expired records on its own.
#[test]
fn test_cleanup_task() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let storage = Arc::clone(&env.storage);

    storage.create("sessions", "a", "x", Some(T0 + 10))?;
    storage.create("sessions", "b", "y", None)?;
    env.clock.advance(Duration::from_millis(10));

    let task = storage.start_cleanup(Duration::from_millis(20))?;
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while storage.stored_len("sessions") != 1 {
        assert!(std::time::Instant::now() < deadline, "cleanup task did not reap");
        std::thread::sleep(Duration::from_millis(10));
    }
    task.shutdown();

    assert!(storage.read("sessions", "b")?.is_some());
    Ok(())
}
