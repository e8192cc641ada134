//! Trust evaluation.
//!
//! [`SignatureTrustEngine`] answers one question: was this signature made
//! by a key that the trusted criteria vouch for? It resolves candidate keys
//! from the signature's own `KeyInfo`, verifies the signature with each, and
//! asks a [`TrustModel`] whether a verifying candidate is trusted.
//!
//! # Trust Models
//!
//! - [`ExplicitKeyTrustModel`] - The candidate must hold the same key as a
//!   trusted credential
//! - [`PkixTrustModel`] - The candidate's certificate must chain to a trust
//!   anchor within a bounded path depth
//!
//! Trust decisions are never cached. Trusted material may rotate between
//! calls.

mod client_cert;
mod engine;
mod explicit_key;
mod pkix;

pub use client_cert::{CertificateNameOptions, ClientCertAuthRule, MessageContext};
pub use engine::SignatureTrustEngine;
pub use explicit_key::ExplicitKeyTrustModel;
pub use pkix::{
    PathDepth, PkixTrustModel, PkixValidationInformation, PkixValidationInformationResolver,
    StaticPkixValidationInformationResolver,
};

use std::sync::Arc;

use crate::credential::{Credential, CriteriaSet};
use crate::error::SecurityResult;

/// Trust predicate plugged into [`SignatureTrustEngine`].
pub trait TrustModel: Send + Sync {
    /// Independently resolved trusted material for one evaluation.
    type Basis;

    /// Resolves the trust basis for `criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error if trusted material could not be resolved.
    fn resolve_basis(&self, criteria: &CriteriaSet) -> SecurityResult<Self::Basis>;

    /// Returns true if `untrusted` is trusted under `basis`.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnsupportedOperation`](crate::SecurityError::UnsupportedOperation)
    /// if this model cannot judge the credential at all.
    fn evaluate_trust(&self, untrusted: &Credential, basis: &Self::Basis) -> SecurityResult<bool>;

    /// Credentials to try directly when no `KeyInfo` candidate succeeds.
    fn fallback_credentials(&self, basis: &Self::Basis) -> Vec<Arc<Credential>>;
}

/// Decides whether a bare credential is trusted.
pub trait CredentialTrustEngine: Send + Sync {
    /// Returns true if `untrusted` is trusted for `trusted_criteria`.
    ///
    /// # Errors
    ///
    /// Returns an error if trusted material could not be resolved.
    fn validate_credential(
        &self,
        untrusted: &Credential,
        trusted_criteria: &CriteriaSet,
    ) -> SecurityResult<bool>;
}
