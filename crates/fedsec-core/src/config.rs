//! Configuration management for fedsec.
//!
//! Configuration is an explicitly constructed value handed to each component
//! by reference. There are no process-wide registries, so independent
//! configurations can coexist in one process.
//!
//! Every section is optional in TOML and falls back to secure defaults:
//!
//! ```toml
//! [storage]
//! key_size = 255
//! cleanup_interval_secs = 900
//!
//! [replay]
//! strict = true
//!
//! [trust]
//! max_path_depth = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest context and key size any storage backend may advertise.
pub const MIN_STORAGE_KEY_SIZE: usize = 255;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage service configuration.
    pub storage: StorageConfig,
    /// Replay cache configuration.
    pub replay: ReplayConfig,
    /// Signature creation and verification configuration.
    pub signature: SignatureConfig,
    /// Trust evaluation configuration.
    pub trust: TrustConfig,
    /// XML encryption configuration.
    pub encryption: EncryptionConfig,
}

/// Storage service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Maximum context length in bytes.
    #[serde(default = "default_storage_key_size")]
    pub context_size: usize,
    /// Maximum key length in bytes.
    #[serde(default = "default_storage_key_size")]
    pub key_size: usize,
    /// Maximum value length in bytes.
    #[serde(default = "default_storage_value_size")]
    pub value_size: usize,
    /// Interval between background reaper sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_storage_key_size() -> usize {
    MIN_STORAGE_KEY_SIZE
}

fn default_storage_value_size() -> usize {
    512 * 1024
}

fn default_cleanup_interval_secs() -> u64 {
    900
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            context_size: default_storage_key_size(),
            key_size: default_storage_key_size(),
            value_size: default_storage_value_size(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl StorageConfig {
    /// Sets the maximum key length.
    #[must_use]
    pub const fn key_size(mut self, key_size: usize) -> Self {
        self.key_size = key_size;
        self
    }

    /// Sets the maximum context length.
    #[must_use]
    pub const fn context_size(mut self, context_size: usize) -> Self {
        self.context_size = context_size;
        self
    }

    /// Sets the reaper interval.
    #[must_use]
    pub const fn cleanup_interval_secs(mut self, secs: u64) -> Self {
        self.cleanup_interval_secs = secs;
        self
    }
}

/// Replay cache configuration.
///
/// ## NIST 800-53 Rev5: IA-2(8) (Replay-Resistant Authentication)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Treat storage failures as replays (fail closed).
    #[serde(default = "default_true")]
    pub strict: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Signature configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Signature algorithm URI used when signing.
    #[serde(default = "default_signature_algorithm")]
    pub algorithm: String,
    /// Canonicalization algorithm URI used when signing.
    #[serde(default = "default_canonicalization")]
    pub canonicalization: String,
    /// Accept SHA-1 based signatures during verification.
    #[serde(default)]
    pub allow_sha1: bool,
}

fn default_signature_algorithm() -> String {
    "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256".to_string()
}

fn default_canonicalization() -> String {
    "http://www.w3.org/2001/10/xml-exc-c14n#".to_string()
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            algorithm: default_signature_algorithm(),
            canonicalization: default_canonicalization(),
            allow_sha1: false,
        }
    }
}

/// Trust evaluation configuration.
///
/// ## NIST 800-53 Rev5: IA-5(2) (Public Key-Based Authentication)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Maximum number of certificates in a PKIX path, excluding the anchor.
    #[serde(default = "default_max_path_depth")]
    pub max_path_depth: u32,
    /// Lift the path depth bound entirely. Must be set explicitly.
    #[serde(default)]
    pub unlimited_path_depth: bool,
}

fn default_max_path_depth() -> u32 {
    2
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            max_path_depth: default_max_path_depth(),
            unlimited_path_depth: false,
        }
    }
}

/// XML encryption configuration.
///
/// ## NIST 800-53 Rev5: SC-13 (Cryptographic Protection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Block encryption algorithm URI for `EncryptedData`.
    #[serde(default = "default_data_algorithm")]
    pub data_algorithm: String,
    /// Key transport algorithm URI for RSA key encryption keys.
    #[serde(default = "default_key_transport_algorithm")]
    pub key_transport_algorithm: String,
    /// Key wrap algorithm URI for symmetric key encryption keys.
    #[serde(default = "default_key_wrap_algorithm")]
    pub key_wrap_algorithm: String,
}

fn default_data_algorithm() -> String {
    "http://www.w3.org/2009/xmlenc11#aes256-gcm".to_string()
}

fn default_key_transport_algorithm() -> String {
    "http://www.w3.org/2001/04/xmlenc#rsa-oaep-mgf1p".to_string()
}

fn default_key_wrap_algorithm() -> String {
    "http://www.w3.org/2001/04/xmlenc#kw-aes256".to_string()
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            data_algorithm: default_data_algorithm(),
            key_transport_algorithm: default_key_transport_algorithm(),
            key_wrap_algorithm: default_key_wrap_algorithm(),
        }
    }
}

impl Config {
    /// Parses configuration from a TOML document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed or fails
    /// [`Config::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Writes configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Configuration for tests: short reaper interval, strict replay.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            storage: StorageConfig::default().cleanup_interval_secs(1),
            ..Self::default()
        }
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.storage.context_size < MIN_STORAGE_KEY_SIZE {
            return Err(Error::Config(format!(
                "storage.context_size must be at least {MIN_STORAGE_KEY_SIZE}"
            )));
        }
        if self.storage.key_size < MIN_STORAGE_KEY_SIZE {
            return Err(Error::Config(format!(
                "storage.key_size must be at least {MIN_STORAGE_KEY_SIZE}"
            )));
        }
        if self.storage.value_size == 0 {
            return Err(Error::Config("storage.value_size must be positive".to_string()));
        }
        if self.storage.cleanup_interval_secs == 0 {
            return Err(Error::Config(
                "storage.cleanup_interval_secs must be positive".to_string(),
            ));
        }
        for (name, uri) in [
            ("signature.algorithm", &self.signature.algorithm),
            ("encryption.data_algorithm", &self.encryption.data_algorithm),
            (
                "encryption.key_transport_algorithm",
                &self.encryption.key_transport_algorithm,
            ),
            ("encryption.key_wrap_algorithm", &self.encryption.key_wrap_algorithm),
        ] {
            if uri.trim().is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fail_closed() {
        let config = Config::default();
        assert!(config.replay.strict);
        assert!(!config.trust.unlimited_path_depth);
        assert!(!config.signature.allow_sha1);
        assert_eq!(config.storage.key_size, 255);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [replay]
            strict = false

            [trust]
            max_path_depth = 4
            "#,
        )
        .unwrap();

        assert!(!config.replay.strict);
        assert_eq!(config.trust.max_path_depth, 4);
        assert_eq!(config.storage.cleanup_interval_secs, 900);
        assert_eq!(
            config.encryption.data_algorithm,
            "http://www.w3.org/2009/xmlenc11#aes256-gcm"
        );
    }

    #[test]
    fn undersized_key_capability_is_rejected() {
        let err = Config::from_toml_str("[storage]\nkey_size = 64\n").unwrap_err();
        assert!(err.to_string().contains("storage.key_size"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = Config::from_toml_str("[replay\nstrict = ").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fedsec.toml");

        let mut config = Config::for_testing();
        config.trust.unlimited_path_depth = true;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
