//! Signing and trust evaluation tests.

use std::sync::Arc;

use fedsec_crypto::SignatureAlgorithm;
use fedsec_integration_tests::Authority;
use fedsec_xmlsec::trust::{
    MessageContext, PathDepth, PkixValidationInformation, StaticPkixValidationInformationResolver,
};
use fedsec_xmlsec::{
    BasicKeyInfoGenerator, ClientCertAuthRule, Credential, CriteriaSet, ExplicitKeyTrustModel,
    KeyInfoCredentialResolver, PkixTrustModel, SignatureTrustEngine, Signer,
    StaticCredentialResolver, UsageType,
};

const IDP: &str = "https://idp.example.org/idp/shibboleth";
const SIGNED_INFO: &[u8] = b"<ds:SignedInfo><ds:Reference URI=\"#_resp1\"/></ds:SignedInfo>";

fn pkix_engine(anchor: Vec<u8>, depth: PathDepth) -> SignatureTrustEngine<PkixTrustModel> {
    let info = PkixValidationInformation::new(vec![anchor]).with_depth(depth);
    let model = PkixTrustModel::new(Arc::new(StaticPkixValidationInformationResolver::new(info)));
    SignatureTrustEngine::new(model, Arc::new(KeyInfoCredentialResolver::new()))
}

/// A response signed by a key whose certificate chains through an
/// intermediate to a trusted root.
#[test]
fn test_pkix_signed_response() -> anyhow::Result<()> {
    let root = Authority::root("Federation Root")?;
    let issuing = root.subordinate("Federation Issuing CA")?;
    let leaf = issuing.issue("idp.example.org")?;

    let chain = vec![
        leaf.entity_certificate().unwrap_or_default().to_vec(),
        issuing.der(),
    ];
    let signing = Credential::from_certificate_chain(chain)?
        .with_private_key(leaf.private_key().unwrap_or_default().to_vec())?;

    let signer = Signer::new(Arc::new(signing))
        .with_algorithm(SignatureAlgorithm::EcdsaSha256)
        .with_key_info_generator(Arc::new(
            BasicKeyInfoGenerator::new().emit_certificate_chain(true),
        ));
    let signature = signer.sign(Some("#_resp1"), SIGNED_INFO)?;
    assert_eq!(signature.reference_uri(), Some("#_resp1"));

    let criteria = CriteriaSet::for_entity(IDP).with_usage(UsageType::Signing);

    let engine = pkix_engine(root.der(), PathDepth::default());
    assert!(engine.validate(&signature, &criteria)?);
    let validated = signature.validating_credential().expect("validating credential recorded");
    assert!(validated.same_key_material(&leaf));

    // leaf + intermediate does not fit in a path of one.
    let shallow = pkix_engine(root.der(), PathDepth::Limited(1));
    assert!(!shallow.validate(&signature, &criteria)?);

    let stranger = Authority::root("Federation Root")?;
    let untrusted = pkix_engine(stranger.der(), PathDepth::default());
    assert!(!untrusted.validate(&signature, &criteria)?);

    Ok(())
}

/// Explicit key trust against metadata-registered credentials.
#[test]
fn test_explicit_key_metadata_trust() -> anyhow::Result<()> {
    let root = Authority::root("Self Signed Keys")?;
    let idp_key = root.issue("idp.example.org")?;
    let registered = Credential::from_certificate(idp_key.entity_certificate().unwrap_or_default().to_vec())?
        .with_entity_id(IDP)
        .with_usage(UsageType::Signing);

    let model = ExplicitKeyTrustModel::new(Arc::new(StaticCredentialResolver::new([registered])));
    let engine = SignatureTrustEngine::new(model, Arc::new(KeyInfoCredentialResolver::new()));

    let signature = Signer::new(Arc::new(idp_key))
        .with_algorithm(SignatureAlgorithm::EcdsaSha256)
        .with_key_info_generator(Arc::new(BasicKeyInfoGenerator::new()))
        .sign(Some("#_resp1"), SIGNED_INFO)?;

    assert!(engine.validate(&signature, &CriteriaSet::for_entity(IDP))?);
    assert!(!engine.validate(
        &signature,
        &CriteriaSet::for_entity("https://other.example.org/idp")
    )?);

    Ok(())
}

/// Detached signature over query-string octets, as in the HTTP-Redirect
/// binding; the verifying key comes from the trusted set alone.
#[test]
fn test_redirect_binding_signature() -> anyhow::Result<()> {
    let root = Authority::root("Self Signed Keys")?;
    let sp_key = root.issue("sp.example.org")?;
    let registered = Credential::from_certificate(sp_key.entity_certificate().unwrap_or_default().to_vec())?
        .with_entity_id("https://sp.example.org");

    let content = b"SAMLRequest=fZJdT8IwFIb%2FSu97v43B&RelayState=xyz&SigAlg=ecdsa-sha256";
    let signer = Signer::new(Arc::new(sp_key)).with_algorithm(SignatureAlgorithm::EcdsaSha256);
    let signature_value = signer.sign_raw(content)?;

    let model = ExplicitKeyTrustModel::new(Arc::new(StaticCredentialResolver::new([registered])));
    let engine = SignatureTrustEngine::new(model, Arc::new(KeyInfoCredentialResolver::new()));
    let criteria = CriteriaSet::for_entity("https://sp.example.org");

    assert!(engine.validate_raw(
        &signature_value,
        content,
        SignatureAlgorithm::EcdsaSha256.uri(),
        &criteria,
        None,
    )?);
    assert!(!engine.validate_raw(
        &signature_value,
        b"SAMLRequest=tampered",
        SignatureAlgorithm::EcdsaSha256.uri(),
        &criteria,
        None,
    )?);

    Ok(())
}

/// A TLS client certificate authenticates the message issuer.
#[test]
fn test_client_certificate_authentication() -> anyhow::Result<()> {
    let root = Authority::root("Federation Root")?;
    let sp_tls = root.issue("sp.example.org")?;
    let peer = Arc::new(Credential::from_certificate(
        sp_tls.entity_certificate().unwrap_or_default().to_vec(),
    )?);

    let engine = Arc::new(pkix_engine(root.der(), PathDepth::default()));
    let rule = ClientCertAuthRule::new(engine);

    let mut known = MessageContext::with_peer(peer.clone()).with_issuer("https://sp.example.org");
    rule.evaluate(&mut known)?;
    assert!(known.issuer_authenticated);

    let mut derived = MessageContext::with_peer(peer);
    rule.evaluate(&mut derived)?;
    assert!(derived.issuer_authenticated);
    assert_eq!(derived.inbound_issuer.as_deref(), Some("sp.example.org"));

    let rogue = Authority::root("Federation Root")?.issue("sp.example.org")?;
    let mut impostor = MessageContext::with_peer(Arc::new(rogue)).with_issuer("https://sp.example.org");
    assert!(rule.evaluate(&mut impostor).is_err());
    assert!(!impostor.issuer_authenticated);

    Ok(())
}
