//! Credential resolvers.

use std::sync::Arc;

use x509_parser::prelude::{FromDer, X509Certificate};

use super::{Credential, CriteriaSet, KeyInfo};
use crate::error::SecurityResult;

/// Source of credentials matching a [`CriteriaSet`].
///
/// Returning an empty list means "nothing matched". An `Err` means the
/// resolver itself could not do its job, e.g. its backing metadata store is
/// unavailable, and callers must not treat that as an empty result.
pub trait CredentialResolver: Send + Sync {
    /// Resolves every credential matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution could not be performed.
    fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<Arc<Credential>>>;

    /// Resolves the first credential matching `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution could not be performed.
    fn resolve_single(&self, criteria: &CriteriaSet) -> SecurityResult<Option<Arc<Credential>>> {
        Ok(self.resolve(criteria)?.into_iter().next())
    }
}

impl<R: CredentialResolver + ?Sized> CredentialResolver for Arc<R> {
    fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<Arc<Credential>>> {
        (**self).resolve(criteria)
    }
}

/// Returns true if `credential` is acceptable under `criteria`.
///
/// A criterion the credential carries no data for is treated as satisfied.
fn matches_criteria(credential: &Credential, criteria: &CriteriaSet) -> bool {
    if let (Some(wanted), Some(owner)) = (criteria.entity_id.as_deref(), credential.entity_id()) {
        if wanted != owner {
            return false;
        }
    }
    if !credential.usage().satisfies(criteria.usage) {
        return false;
    }
    if !criteria.key_names.is_empty()
        && !credential.key_names().is_empty()
        && !criteria
            .key_names
            .iter()
            .any(|name| credential.key_names().contains(name))
    {
        return false;
    }
    true
}

// ============================================================================
// Static
// ============================================================================

/// Resolver over a fixed, in-memory set of credentials.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialResolver {
    credentials: Vec<Arc<Credential>>,
}

impl StaticCredentialResolver {
    /// Creates a resolver over `credentials`.
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        Self {
            credentials: credentials.into_iter().map(Arc::new).collect(),
        }
    }

    /// Creates a resolver over already shared credentials.
    #[must_use]
    pub fn from_shared(credentials: Vec<Arc<Credential>>) -> Self {
        Self { credentials }
    }
}

impl CredentialResolver for StaticCredentialResolver {
    fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<Arc<Credential>>> {
        Ok(self
            .credentials
            .iter()
            .filter(|c| matches_criteria(c, criteria))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Chaining
// ============================================================================

/// Resolver that concatenates the results of several resolvers in order.
///
/// The first failing resolver aborts resolution.
#[derive(Default, Clone)]
pub struct ChainingCredentialResolver {
    resolvers: Vec<Arc<dyn CredentialResolver>>,
}

impl ChainingCredentialResolver {
    /// Creates a chaining resolver.
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn CredentialResolver>>) -> Self {
        Self { resolvers }
    }

    /// Appends a resolver.
    #[must_use]
    pub fn with(mut self, resolver: Arc<dyn CredentialResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }
}

impl std::fmt::Debug for ChainingCredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainingCredentialResolver")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl CredentialResolver for ChainingCredentialResolver {
    fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<Arc<Credential>>> {
        let mut resolved = Vec::new();
        for resolver in &self.resolvers {
            resolved.extend(resolver.resolve(criteria)?);
        }
        Ok(resolved)
    }
}

// ============================================================================
// KeyInfo
// ============================================================================

/// Resolver that derives credentials from the untrusted `KeyInfo` in the
/// criteria.
///
/// Certificates become one X.509 credential whose chain holds every
/// certificate, entity certificate first. Each bare public key becomes its
/// own credential. Key names are attached to everything produced.
///
/// With a local resolver configured, the derived key material is instead
/// used to look up matching local credentials, typically ones holding
/// private keys for decryption.
#[derive(Default, Clone)]
pub struct KeyInfoCredentialResolver {
    local: Option<Arc<dyn CredentialResolver>>,
}

impl KeyInfoCredentialResolver {
    /// Creates a resolver returning credentials built from `KeyInfo`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns local credentials matched by `KeyInfo` instead.
    #[must_use]
    pub fn with_local_resolver(mut self, local: Arc<dyn CredentialResolver>) -> Self {
        self.local = Some(local);
        self
    }

    fn extract(key_info: &KeyInfo) -> Vec<Credential> {
        let mut extracted = Vec::new();

        if !key_info.x509_certificates.is_empty() {
            let chain = order_entity_first(&key_info.x509_certificates);
            match Credential::from_certificate_chain(chain) {
                Ok(credential) => extracted.push(credential),
                Err(e) => tracing::warn!(error = %e, "skipping unusable KeyInfo certificate"),
            }
        }

        for spki in &key_info.public_keys {
            match Credential::from_public_key(spki.clone()) {
                Ok(credential) => extracted.push(credential),
                Err(e) => tracing::warn!(error = %e, "skipping unusable KeyInfo public key"),
            }
        }

        extracted
            .into_iter()
            .map(|credential| {
                key_info
                    .key_names
                    .iter()
                    .fold(credential, |c, name| c.with_key_name(name.clone()))
            })
            .collect()
    }

    fn resolve_local(
        local: &dyn CredentialResolver,
        key_info: &KeyInfo,
        extracted: &[Credential],
        criteria: &CriteriaSet,
    ) -> SecurityResult<Vec<Arc<Credential>>> {
        let local_criteria = CriteriaSet {
            entity_id: criteria.entity_id.clone(),
            usage: criteria.usage,
            key_names: Vec::new(),
            key_info: None,
        };

        Ok(local
            .resolve(&local_criteria)?
            .into_iter()
            .filter(|candidate| {
                let named = candidate
                    .key_names()
                    .iter()
                    .any(|name| key_info.key_names.contains(name));
                named || extracted.iter().any(|e| e.same_key_material(candidate))
            })
            .collect())
    }
}

impl std::fmt::Debug for KeyInfoCredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyInfoCredentialResolver")
            .field("local", &self.local.is_some())
            .finish()
    }
}

impl CredentialResolver for KeyInfoCredentialResolver {
    fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<Arc<Credential>>> {
        let Some(key_info) = &criteria.key_info else {
            return Ok(Vec::new());
        };
        let extracted = Self::extract(key_info);

        match &self.local {
            Some(local) => Self::resolve_local(local.as_ref(), key_info, &extracted, criteria),
            None => Ok(extracted
                .into_iter()
                .filter(|c| matches_criteria(c, criteria))
                .map(Arc::new)
                .collect()),
        }
    }
}

/// Puts the entity certificate first: the first certificate whose subject
/// issued none of the others.
fn order_entity_first(certificates: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let names: Vec<Option<(String, String)>> = certificates
        .iter()
        .map(|der| {
            X509Certificate::from_der(der)
                .ok()
                .map(|(_, cert)| (cert.subject().to_string(), cert.issuer().to_string()))
        })
        .collect();

    let is_issuer_of_another = |i: usize| {
        let Some((subject, _)) = &names[i] else {
            return false;
        };
        names.iter().enumerate().any(|(j, other)| {
            j != i && other.as_ref().is_some_and(|(_, issuer)| issuer == subject)
        })
    };

    let entity = (0..certificates.len())
        .find(|&i| names[i].is_some() && !is_issuer_of_another(i))
        .unwrap_or(0);

    let mut ordered = Vec::with_capacity(certificates.len());
    ordered.push(certificates[entity].clone());
    ordered.extend(
        certificates
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != entity)
            .map(|(_, der)| der.clone()),
    );
    ordered
}
