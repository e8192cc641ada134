//! Signature trust engine.

use std::sync::Arc;

use fedsec_core::event::{EventType, SecurityEvent};

use super::{CredentialTrustEngine, TrustModel};
use crate::credential::{Credential, CredentialResolver, CriteriaSet, UsageType};
use crate::error::{SecurityError, SecurityResult};
use crate::signature::{Signature, SignatureVerifier};

/// Evaluates signature trust under a pluggable [`TrustModel`].
///
/// Evaluation order:
///
/// 1. Reject empty signature values before doing any work
/// 2. Resolve the trust basis from the trusted criteria
/// 3. Resolve candidates from the signature's `KeyInfo` (usage = signing)
/// 4. For each candidate: verify, then evaluate trust; the first candidate
///    passing both wins
/// 5. Otherwise try the model's fallback credentials the same way
///
/// Resolver failures surface as [`SecurityError::EvaluationFailure`], never
/// as an untrusted result.
pub struct SignatureTrustEngine<M: TrustModel> {
    model: M,
    key_info_resolver: Arc<dyn CredentialResolver>,
    verifier: SignatureVerifier,
}

impl<M: TrustModel> SignatureTrustEngine<M> {
    /// Creates an engine.
    ///
    /// # Arguments
    ///
    /// * `model` - Trust predicate and trusted material
    /// * `key_info_resolver` - Derives candidate credentials from untrusted `KeyInfo`
    pub fn new(model: M, key_info_resolver: Arc<dyn CredentialResolver>) -> Self {
        Self {
            model,
            key_info_resolver,
            verifier: SignatureVerifier::new(),
        }
    }

    /// Replaces the signature verifier.
    #[must_use]
    pub fn with_verifier(mut self, verifier: SignatureVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// Returns the trust model.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Returns true if `signature` was made by a trusted signer.
    ///
    /// On success the validating credential is recorded on the signature.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::PreconditionViolation`] if the signature value or
    ///   signed content is empty
    /// - [`SecurityError::EvaluationFailure`] if a resolver fails
    /// - [`SecurityError::UnsupportedOperation`] for unknown or disallowed
    ///   signature algorithms
    pub fn validate(
        &self,
        signature: &Signature,
        trusted_criteria: &CriteriaSet,
    ) -> SecurityResult<bool> {
        if signature.signature_value().is_empty() {
            return Err(SecurityError::precondition("signature value is empty"));
        }
        if signature.signed_info().is_empty() {
            return Err(SecurityError::precondition("signed content is empty"));
        }

        let basis = self.resolve_basis(trusted_criteria)?;
        let verify = |credential: &Credential| self.verifier.verify(signature, credential);

        let candidates = self.resolve_candidates(signature, trusted_criteria)?;
        tracing::debug!(
            candidates = candidates.len(),
            algorithm = signature.signature_algorithm(),
            "evaluating signature trust"
        );

        let validated = match self.first_trusted(&candidates, &basis, verify)? {
            Some(credential) => Some(credential),
            None => self.first_trusted(&self.model.fallback_credentials(&basis), &basis, verify)?,
        };

        let trusted = match validated {
            Some(credential) => {
                signature.set_validating_credential(credential);
                true
            }
            None => false,
        };
        audit(trusted_criteria, trusted, signature.reference_uri());
        Ok(trusted)
    }

    /// Returns true if a detached signature over `content` was made by a
    /// trusted signer.
    ///
    /// This is the HTTP-Redirect binding form: the caller supplies the
    /// candidate credential, if any, instead of `KeyInfo`.
    ///
    /// # Errors
    ///
    /// As for [`validate`](Self::validate).
    pub fn validate_raw(
        &self,
        signature_value: &[u8],
        content: &[u8],
        algorithm_uri: &str,
        trusted_criteria: &CriteriaSet,
        candidate: Option<Arc<Credential>>,
    ) -> SecurityResult<bool> {
        if signature_value.is_empty() {
            return Err(SecurityError::precondition("signature value is empty"));
        }
        if content.is_empty() {
            return Err(SecurityError::precondition("signed content is empty"));
        }
        if algorithm_uri.is_empty() {
            return Err(SecurityError::precondition("signature algorithm is empty"));
        }

        let basis = self.resolve_basis(trusted_criteria)?;
        let verify = |credential: &Credential| {
            self.verifier
                .verify_raw(algorithm_uri, credential, content, signature_value)
        };

        let candidates: Vec<Arc<Credential>> = candidate.into_iter().collect();
        let trusted = self.first_trusted(&candidates, &basis, verify)?.is_some()
            || self
                .first_trusted(&self.model.fallback_credentials(&basis), &basis, verify)?
                .is_some();

        audit(trusted_criteria, trusted, None);
        Ok(trusted)
    }

    fn resolve_basis(&self, criteria: &CriteriaSet) -> SecurityResult<M::Basis> {
        self.model
            .resolve_basis(criteria)
            .map_err(|e| as_evaluation_failure("trusted credential resolution", e))
    }

    fn resolve_candidates(
        &self,
        signature: &Signature,
        trusted_criteria: &CriteriaSet,
    ) -> SecurityResult<Vec<Arc<Credential>>> {
        let Some(key_info) = signature.key_info() else {
            return Ok(Vec::new());
        };
        let criteria = CriteriaSet {
            entity_id: trusted_criteria.entity_id.clone(),
            usage: UsageType::Signing,
            key_names: Vec::new(),
            key_info: Some(key_info.clone()),
        };
        self.key_info_resolver
            .resolve(&criteria)
            .map_err(|e| as_evaluation_failure("KeyInfo credential resolution", e))
    }

    /// Returns the first candidate that verifies and is trusted.
    fn first_trusted<F>(
        &self,
        candidates: &[Arc<Credential>],
        basis: &M::Basis,
        verify: F,
    ) -> SecurityResult<Option<Arc<Credential>>>
    where
        F: Fn(&Credential) -> SecurityResult<bool>,
    {
        for candidate in candidates {
            if !verify(candidate.as_ref())? {
                tracing::debug!("signature did not verify with candidate credential");
                continue;
            }
            if self.is_trusted(candidate, basis)? {
                return Ok(Some(Arc::clone(candidate)));
            }
            tracing::debug!("candidate verified the signature but is not trusted");
        }
        Ok(None)
    }

    /// Evaluates trust for one candidate, treating "cannot judge" as untrusted.
    fn is_trusted(&self, candidate: &Credential, basis: &M::Basis) -> SecurityResult<bool> {
        match self.model.evaluate_trust(candidate, basis) {
            Ok(trusted) => Ok(trusted),
            Err(
                SecurityError::UnsupportedOperation(reason)
                | SecurityError::InvalidCredential(reason),
            ) => {
                tracing::debug!(%reason, "trust model cannot evaluate candidate");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

impl<M: TrustModel> CredentialTrustEngine for SignatureTrustEngine<M> {
    fn validate_credential(
        &self,
        untrusted: &Credential,
        trusted_criteria: &CriteriaSet,
    ) -> SecurityResult<bool> {
        let basis = self.resolve_basis(trusted_criteria)?;
        self.is_trusted(untrusted, &basis)
    }
}

impl<M: TrustModel + std::fmt::Debug> std::fmt::Debug for SignatureTrustEngine<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureTrustEngine")
            .field("model", &self.model)
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

fn as_evaluation_failure(stage: &str, error: SecurityError) -> SecurityError {
    match error {
        SecurityError::EvaluationFailure(_) => error,
        other => SecurityError::evaluation(format!("{stage} failed: {other}")),
    }
}

fn audit(criteria: &CriteriaSet, trusted: bool, reference: Option<&str>) {
    let mut event = SecurityEvent::builder(EventType::SignatureTrustEvaluation);
    if let Some(entity_id) = &criteria.entity_id {
        event = event.entity(entity_id.clone());
    }
    if let Some(reference) = reference {
        event = event.detail("reference", reference);
    }
    if trusted {
        event.success().emit();
    } else {
        event.failure("no trusted signer").emit();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fedsec_crypto::SignatureAlgorithm;

    use super::*;
    use crate::credential::{KeyInfo, KeyInfoCredentialResolver, StaticCredentialResolver};
    use crate::signature::Signer;
    use crate::test_support::self_signed;

    /// Returns a fixed candidate list and counts calls.
    struct RecordingResolver {
        candidates: Vec<Arc<Credential>>,
        calls: AtomicUsize,
    }

    impl CredentialResolver for RecordingResolver {
        fn resolve(&self, criteria: &CriteriaSet) -> SecurityResult<Vec<Arc<Credential>>> {
            assert_eq!(criteria.usage, UsageType::Signing);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }
    }

    /// Trusts everything and counts evaluations.
    #[derive(Default)]
    struct RecordingModel {
        evaluations: AtomicUsize,
        fallback: Vec<Arc<Credential>>,
    }

    impl TrustModel for RecordingModel {
        type Basis = ();

        fn resolve_basis(&self, _: &CriteriaSet) -> SecurityResult<()> {
            Ok(())
        }

        fn evaluate_trust(&self, _: &Credential, _: &()) -> SecurityResult<bool> {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        fn fallback_credentials(&self, _: &()) -> Vec<Arc<Credential>> {
            self.fallback.clone()
        }
    }

    /// Trusts one credential only and counts evaluations.
    struct TrustsOnly {
        trusted: Arc<Credential>,
        evaluations: AtomicUsize,
    }

    impl TrustModel for TrustsOnly {
        type Basis = ();

        fn resolve_basis(&self, _: &CriteriaSet) -> SecurityResult<()> {
            Ok(())
        }

        fn evaluate_trust(&self, candidate: &Credential, _: &()) -> SecurityResult<bool> {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            Ok(std::ptr::eq(candidate, self.trusted.as_ref()))
        }

        fn fallback_credentials(&self, _: &()) -> Vec<Arc<Credential>> {
            Vec::new()
        }
    }

    struct FailingModel;

    impl TrustModel for FailingModel {
        type Basis = ();

        fn resolve_basis(&self, _: &CriteriaSet) -> SecurityResult<()> {
            Err(SecurityError::InvalidCredential("metadata store offline".into()))
        }

        fn evaluate_trust(&self, _: &Credential, _: &()) -> SecurityResult<bool> {
            unreachable!("basis resolution fails first")
        }

        fn fallback_credentials(&self, _: &()) -> Vec<Arc<Credential>> {
            Vec::new()
        }
    }

    fn hmac_signature(secret: &[u8]) -> Signature {
        Signer::new(Arc::new(Credential::from_secret(secret.to_vec())))
            .with_algorithm(SignatureAlgorithm::HmacSha256)
            .sign(Some("#_msg"), b"<SignedInfo>msg</SignedInfo>")
            .unwrap()
            .with_key_info(KeyInfo::new().with_key_name("unused"))
    }

    #[test]
    fn short_circuits_on_first_trusted_candidate() {
        let wrong = Arc::new(Credential::from_secret(vec![1; 32]));
        let right = Arc::new(Credential::from_secret(vec![2; 32]));
        let also_right = Arc::new(Credential::from_secret(vec![2; 32]));

        let resolver = Arc::new(RecordingResolver {
            candidates: vec![wrong, right.clone(), also_right],
            calls: AtomicUsize::new(0),
        });
        let engine = SignatureTrustEngine::new(RecordingModel::default(), resolver.clone());

        let signature = hmac_signature(&[2; 32]);
        assert!(engine.validate(&signature, &CriteriaSet::new()).unwrap());

        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        // Only the first verifying candidate reaches the trust model.
        assert_eq!(engine.model().evaluations.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&signature.validating_credential().unwrap(), &right));
    }

    #[test]
    fn verified_but_untrusted_candidate_moves_on() {
        let first = Arc::new(Credential::from_secret(vec![2; 32]));
        let second = Arc::new(Credential::from_secret(vec![2; 32]));
        let third = Arc::new(Credential::from_secret(vec![2; 32]));

        let resolver = Arc::new(RecordingResolver {
            candidates: vec![first, second.clone(), third],
            calls: AtomicUsize::new(0),
        });
        let model = TrustsOnly {
            trusted: second.clone(),
            evaluations: AtomicUsize::new(0),
        };
        let engine = SignatureTrustEngine::new(model, resolver);

        let signature = hmac_signature(&[2; 32]);
        assert!(engine.validate(&signature, &CriteriaSet::new()).unwrap());

        // The first candidate verifies but is not trusted; the third is never evaluated.
        assert_eq!(engine.model().evaluations.load(Ordering::SeqCst), 2);
        assert!(Arc::ptr_eq(&signature.validating_credential().unwrap(), &second));
    }

    #[test]
    fn falls_back_to_model_credentials() {
        let trusted = Arc::new(Credential::from_secret(vec![3; 32]));
        let model = RecordingModel {
            fallback: vec![trusted],
            ..RecordingModel::default()
        };
        let engine = SignatureTrustEngine::new(model, Arc::new(KeyInfoCredentialResolver::new()));

        let signature = hmac_signature(&[3; 32]);
        assert!(engine.validate(&signature, &CriteriaSet::new()).unwrap());

        let signature = hmac_signature(&[4; 32]);
        assert!(!engine.validate(&signature, &CriteriaSet::new()).unwrap());
        assert!(signature.validating_credential().is_none());
    }

    #[test]
    fn empty_signature_value_is_precondition_violation() {
        let engine = SignatureTrustEngine::new(
            RecordingModel::default(),
            Arc::new(KeyInfoCredentialResolver::new()),
        );
        let signature = Signature::new("urn:alg", "urn:c14n", b"content".to_vec(), Vec::new());

        assert!(matches!(
            engine.validate(&signature, &CriteriaSet::new()),
            Err(SecurityError::PreconditionViolation(_))
        ));
        assert!(matches!(
            engine.validate_raw(&[1], b"", "urn:alg", &CriteriaSet::new(), None),
            Err(SecurityError::PreconditionViolation(_))
        ));
        assert_eq!(engine.model().evaluations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn basis_failure_is_evaluation_failure() {
        let engine =
            SignatureTrustEngine::new(FailingModel, Arc::new(KeyInfoCredentialResolver::new()));
        let err = engine
            .validate(&hmac_signature(&[1; 32]), &CriteriaSet::new())
            .unwrap_err();
        assert!(matches!(err, SecurityError::EvaluationFailure(msg) if msg.contains("offline")));
    }

    #[test]
    fn candidate_resolver_failure_is_not_untrusted() {
        struct Broken;
        impl CredentialResolver for Broken {
            fn resolve(&self, _: &CriteriaSet) -> SecurityResult<Vec<Arc<Credential>>> {
                Err(SecurityError::InvalidCredential("bad KeyInfo".into()))
            }
        }

        let engine = SignatureTrustEngine::new(RecordingModel::default(), Arc::new(Broken));
        assert!(matches!(
            engine.validate(&hmac_signature(&[1; 32]), &CriteriaSet::new()),
            Err(SecurityError::EvaluationFailure(_))
        ));
    }

    #[test]
    fn validate_raw_uses_supplied_candidate() {
        let leaf = self_signed("sp.example.org");
        let signing = Arc::new(leaf.credential());
        let content = b"SAMLRequest=abc&SigAlg=ecdsa";
        let sig = Signer::new(signing)
            .with_algorithm(SignatureAlgorithm::EcdsaSha256)
            .sign_raw(content)
            .unwrap();

        let candidate = Arc::new(Credential::from_certificate(leaf.der).unwrap());
        let engine = SignatureTrustEngine::new(
            RecordingModel::default(),
            Arc::new(StaticCredentialResolver::default()),
        );
        let alg = SignatureAlgorithm::EcdsaSha256.uri();

        assert!(engine
            .validate_raw(&sig, content, alg, &CriteriaSet::new(), Some(candidate.clone()))
            .unwrap());
        assert!(!engine
            .validate_raw(&sig, b"tampered", alg, &CriteriaSet::new(), Some(candidate))
            .unwrap());
        assert!(!engine
            .validate_raw(&sig, content, alg, &CriteriaSet::new(), None)
            .unwrap());
    }
}
