//! Shared fixtures for the end-to-end tests.
//!
//! [`TestEnv`] wires the crates together the way a relying party would:
//! one configuration, one clock, one storage service, and a replay cache
//! on top of it.

use std::sync::{Arc, Once};

use fedsec_core::clock::ManualClock;
use fedsec_core::config::Config;
use fedsec_storage::{MemoryStorageService, ReplayCache};
use fedsec_xmlsec::Credential;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
};

/// Fixed start time for every environment, in epoch milliseconds.
pub const T0: i64 = 1_700_000_000_000;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        // Another harness may already own the global subscriber.
        let _ = fedsec_core::telemetry::init_tracing("fedsec=debug,fedsec::audit=info");
    });
}

/// Test environment over in-memory storage and a manual clock.
pub struct TestEnv {
    /// Effective configuration.
    pub config: Config,
    /// Clock shared by storage and the test.
    pub clock: Arc<ManualClock>,
    /// Storage backing the replay cache.
    pub storage: Arc<MemoryStorageService>,
    /// Replay cache over [`TestEnv::storage`].
    pub replay: ReplayCache,
}

impl TestEnv {
    /// Creates an environment from [`Config::for_testing`].
    pub fn new() -> Self {
        Self::with_config(Config::for_testing())
    }

    /// Creates an environment from `config`.
    pub fn with_config(config: Config) -> Self {
        init_tracing();

        let clock = Arc::new(ManualClock::new(T0));
        let storage =
            Arc::new(MemoryStorageService::from_config(&config.storage).with_clock(clock.clone()));
        let replay = ReplayCache::from_config(storage.clone(), &config.replay);

        Self {
            config,
            clock,
            storage,
            replay,
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PKI
// ============================================================================

fn params(common_name: &str, is_ca: bool) -> anyhow::Result<CertificateParams> {
    let mut params = CertificateParams::new(vec![common_name.to_string()])?;
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;
    if is_ca {
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    }
    Ok(params)
}

/// An issuing certificate authority.
pub struct Authority {
    cert: Certificate,
    key: KeyPair,
}

impl Authority {
    /// Creates a self-signed root.
    pub fn root(common_name: &str) -> anyhow::Result<Self> {
        let key = KeyPair::generate()?;
        let cert = params(common_name, true)?.self_signed(&key)?;
        Ok(Self { cert, key })
    }

    /// Creates a subordinate CA.
    pub fn subordinate(&self, common_name: &str) -> anyhow::Result<Self> {
        let key = KeyPair::generate()?;
        let cert = params(common_name, true)?.signed_by(&key, &self.cert, &self.key)?;
        Ok(Self { cert, key })
    }

    /// Issues an ECDSA P-256 end-entity credential with its private key.
    pub fn issue(&self, common_name: &str) -> anyhow::Result<Credential> {
        let key = KeyPair::generate()?;
        let cert = params(common_name, false)?.signed_by(&key, &self.cert, &self.key)?;
        Ok(Credential::from_certificate(cert.der().to_vec())?.with_private_key(key.serialize_der())?)
    }

    /// Returns the CA certificate as DER.
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }
}
