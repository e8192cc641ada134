//! Explicit key trust.

use std::sync::Arc;

use super::TrustModel;
use crate::credential::{Credential, CredentialResolver, CriteriaSet};
use crate::error::SecurityResult;

/// Trusts a credential only if it holds the same key as one of the trusted
/// credentials.
///
/// No certificate processing happens: expiry, issuer and extensions of any
/// certificate involved are ignored. This is the SAML metadata
/// interoperability profile's model.
///
/// When no `KeyInfo` candidate succeeds, the trusted credentials themselves
/// are tried directly.
pub struct ExplicitKeyTrustModel {
    trusted: Arc<dyn CredentialResolver>,
}

impl ExplicitKeyTrustModel {
    /// Creates a model over a resolver of trusted credentials.
    #[must_use]
    pub fn new(trusted: Arc<dyn CredentialResolver>) -> Self {
        Self { trusted }
    }
}

impl std::fmt::Debug for ExplicitKeyTrustModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplicitKeyTrustModel").finish_non_exhaustive()
    }
}

impl TrustModel for ExplicitKeyTrustModel {
    type Basis = Vec<Arc<Credential>>;

    fn resolve_basis(&self, criteria: &CriteriaSet) -> SecurityResult<Self::Basis> {
        let trusted_criteria = CriteriaSet {
            key_info: None,
            ..criteria.clone()
        };
        self.trusted.resolve(&trusted_criteria)
    }

    fn evaluate_trust(&self, untrusted: &Credential, basis: &Self::Basis) -> SecurityResult<bool> {
        let trusted = basis
            .iter()
            .any(|candidate| candidate.same_key_material(untrusted));
        if !trusted {
            tracing::debug!(
                trusted_credentials = basis.len(),
                "credential matches no trusted key"
            );
        }
        Ok(trusted)
    }

    fn fallback_credentials(&self, basis: &Self::Basis) -> Vec<Arc<Credential>> {
        basis.clone()
    }
}
