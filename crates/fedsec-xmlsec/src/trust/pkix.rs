//! PKIX trust.
//!
//! A credential is trusted when its entity certificate chains to a trust
//! anchor. Path building walks from the entity certificate through the
//! credential's own chain towards the anchors, checking at each step:
//!
//! - issuer name matches the subject of the next certificate
//! - the signature verifies under the issuer's key
//! - the certificate is inside its validity period
//! - intermediate issuers are CA certificates
//!
//! Path length is bounded by [`PathDepth`]: the number of certificates in
//! the path, not counting the anchor. An entity certificate that is itself
//! an anchor has depth 0.

use std::sync::Arc;

use fedsec_core::clock::{Clock, SystemClock};
use fedsec_core::config::TrustConfig;
use x509_parser::prelude::{FromDer, ParsedExtension, X509Certificate};

use super::client_cert::{certificate_names, CertificateNameOptions};
use super::TrustModel;
use crate::credential::{Credential, CriteriaSet};
use crate::error::{SecurityError, SecurityResult};

/// Maximum certification path depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDepth {
    /// At most this many certificates, excluding the anchor.
    Limited(u32),
    /// No bound. Must be requested explicitly.
    Unlimited,
}

impl Default for PathDepth {
    fn default() -> Self {
        Self::Limited(2)
    }
}

impl PathDepth {
    /// Returns the configured depth.
    #[must_use]
    pub const fn from_config(config: &TrustConfig) -> Self {
        if config.unlimited_path_depth {
            Self::Unlimited
        } else {
            Self::Limited(config.max_path_depth)
        }
    }

    const fn allows(self, depth: usize) -> bool {
        match self {
            Self::Limited(max) => depth <= max as usize,
            Self::Unlimited => true,
        }
    }
}

/// Trusted material for PKIX validation.
#[derive(Debug, Clone, Default)]
pub struct PkixValidationInformation {
    /// Trust anchors as DER certificates.
    pub anchors: Vec<Vec<u8>>,
    /// Maximum path depth.
    pub depth: PathDepth,
    /// If non-empty, the entity certificate must carry one of these names.
    pub trusted_names: Vec<String>,
}

impl PkixValidationInformation {
    /// Creates validation information with the default depth.
    #[must_use]
    pub fn new(anchors: Vec<Vec<u8>>) -> Self {
        Self {
            anchors,
            ..Self::default()
        }
    }

    /// Sets the path depth.
    #[must_use]
    pub const fn with_depth(mut self, depth: PathDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Adds a trusted name.
    #[must_use]
    pub fn with_trusted_name(mut self, name: impl Into<String>) -> Self {
        self.trusted_names.push(name.into());
        self
    }
}

/// Source of PKIX validation information for a set of criteria.
pub trait PkixValidationInformationResolver: Send + Sync {
    /// Resolves validation information applicable to `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error if the information could not be resolved.
    fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<PkixValidationInformation>>;
}

/// Fixed validation information, optionally scoped per entity.
#[derive(Debug, Clone, Default)]
pub struct StaticPkixValidationInformationResolver {
    entries: Vec<(Option<String>, PkixValidationInformation)>,
}

impl StaticPkixValidationInformationResolver {
    /// Creates a resolver applying `info` to every entity.
    #[must_use]
    pub fn new(info: PkixValidationInformation) -> Self {
        Self {
            entries: vec![(None, info)],
        }
    }

    /// Adds information that applies only to `entity_id`.
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_id: impl Into<String>,
        info: PkixValidationInformation,
    ) -> Self {
        self.entries.push((Some(entity_id.into()), info));
        self
    }
}

impl PkixValidationInformationResolver for StaticPkixValidationInformationResolver {
    fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<PkixValidationInformation>> {
        Ok(self
            .entries
            .iter()
            .filter(|(entity, _)| {
                entity.is_none() || entity.as_deref() == criteria.entity_id.as_deref()
            })
            .map(|(_, info)| info.clone())
            .collect())
    }
}

/// Trusts credentials whose certificate chains to a trust anchor.
///
/// There is no fallback: PKIX trust needs the signer's own certificate, so
/// a signature with no usable `KeyInfo` is never trusted.
///
/// Validity periods are checked against the injected [`Clock`].
pub struct PkixTrustModel {
    resolver: Arc<dyn PkixValidationInformationResolver>,
    clock: Arc<dyn Clock>,
}

impl PkixTrustModel {
    /// Creates a model over a validation information resolver.
    #[must_use]
    pub fn new(resolver: Arc<dyn PkixValidationInformationResolver>) -> Self {
        Self {
            resolver,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for validity checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for PkixTrustModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkixTrustModel")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TrustModel for PkixTrustModel {
    type Basis = Vec<PkixValidationInformation>;

    fn resolve_basis(&self, criteria: &CriteriaSet) -> SecurityResult<Self::Basis> {
        self.resolver.resolve(criteria)
    }

    fn evaluate_trust(&self, untrusted: &Credential, basis: &Self::Basis) -> SecurityResult<bool> {
        let Some(entity_der) = untrusted.entity_certificate() else {
            return Err(SecurityError::unsupported(
                "PKIX evaluation requires an X.509 credential",
            ));
        };
        let (_, entity) = X509Certificate::from_der(entity_der)
            .map_err(|e| SecurityError::InvalidCredential(format!("bad entity certificate: {e}")))?;

        let intermediates: Vec<X509Certificate<'_>> = untrusted
            .certificates()
            .iter()
            .skip(1)
            .filter_map(|der| X509Certificate::from_der(der).ok().map(|(_, cert)| cert))
            .collect();
        let now = self.clock.now_millis().div_euclid(1000);

        for info in basis {
            if !info.trusted_names.is_empty() && !has_trusted_name(&entity, &info.trusted_names) {
                tracing::debug!(
                    subject = %entity.subject(),
                    "certificate carries no trusted name"
                );
                continue;
            }

            let anchors: Vec<X509Certificate<'_>> = info
                .anchors
                .iter()
                .filter_map(|der| match X509Certificate::from_der(der) {
                    Ok((_, cert)) => Some(cert),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping unparseable trust anchor");
                        None
                    }
                })
                .collect();

            if info.anchors.iter().any(|der| der.as_slice() == entity_der) {
                if is_valid_at(&entity, now) {
                    return Ok(true);
                }
                continue;
            }

            let path = PathBuilder {
                anchors: &anchors,
                intermediates: &intermediates,
                depth: info.depth,
                now,
            };
            if path.validates(&entity) {
                return Ok(true);
            }
        }

        tracing::debug!(subject = %entity.subject(), "no valid certification path");
        Ok(false)
    }

    fn fallback_credentials(&self, _basis: &Self::Basis) -> Vec<Arc<Credential>> {
        Vec::new()
    }
}

fn has_trusted_name(entity: &X509Certificate<'_>, trusted_names: &[String]) -> bool {
    certificate_names(entity, &CertificateNameOptions::all())
        .iter()
        .any(|name| trusted_names.contains(name))
}

struct PathBuilder<'c, 'a> {
    anchors: &'c [X509Certificate<'a>],
    intermediates: &'c [X509Certificate<'a>],
    depth: PathDepth,
    /// Epoch seconds.
    now: i64,
}

impl PathBuilder<'_, '_> {
    fn validates(&self, entity: &X509Certificate<'_>) -> bool {
        let mut visited = vec![false; self.intermediates.len()];
        self.chains_to_anchor(entity, 1, &mut visited)
    }

    /// `path_len` counts `cert` and everything below it.
    fn chains_to_anchor(
        &self,
        cert: &X509Certificate<'_>,
        path_len: usize,
        visited: &mut [bool],
    ) -> bool {
        if !self.depth.allows(path_len) {
            tracing::debug!(path_len, depth = ?self.depth, "path depth exceeded");
            return false;
        }
        if !is_valid_at(cert, self.now) {
            tracing::debug!(subject = %cert.subject(), "certificate outside validity period");
            return false;
        }

        if self
            .anchors
            .iter()
            .any(|anchor| is_valid_at(anchor, self.now) && issued_by(cert, anchor))
        {
            return true;
        }

        for (i, issuer) in self.intermediates.iter().enumerate() {
            if visited[i] || !is_ca(issuer) || !issued_by(cert, issuer) {
                continue;
            }
            visited[i] = true;
            if self.chains_to_anchor(issuer, path_len + 1, visited) {
                return true;
            }
            visited[i] = false;
        }
        false
    }
}

fn is_valid_at(cert: &X509Certificate<'_>, now_secs: i64) -> bool {
    let validity = cert.validity();
    validity.not_before.timestamp() <= now_secs && now_secs <= validity.not_after.timestamp()
}

fn is_ca(cert: &X509Certificate<'_>) -> bool {
    cert.extensions().iter().any(|ext| {
        matches!(ext.parsed_extension(), ParsedExtension::BasicConstraints(bc) if bc.ca)
    })
}

fn issued_by(cert: &X509Certificate<'_>, issuer: &X509Certificate<'_>) -> bool {
    if cert.issuer().to_string() != issuer.subject().to_string() {
        return false;
    }
    fedsec_crypto::signature::verify_certificate_signature(
        &cert.signature_algorithm.algorithm.to_string(),
        issuer.tbs_certificate.subject_pki.raw,
        cert.tbs_certificate.as_ref(),
        &cert.signature_value.data,
    )
    .unwrap_or_else(|e| {
        tracing::debug!(error = %e, "certificate signature not verifiable");
        false
    })
}
