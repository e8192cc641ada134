//! XML encryption tests between an identity provider and a service provider.

use std::sync::Arc;

use fedsec_core::config::EncryptionConfig;
use fedsec_crypto::algorithm::block_encryption_algorithms;
use fedsec_crypto::keys::RsaKeyTransportPair;
use fedsec_xmlsec::encryption::{
    ChainingEncryptedKeyResolver, InlineEncryptedKeyResolver, RetrievalMethodEncryptedKeyResolver,
};
use fedsec_xmlsec::{
    Credential, Decrypter, EncryptedElement, Encrypter, EncryptionParameters,
    KeyEncryptionParameters, SecurityError, StaticCredentialResolver,
};

const SP: &str = "https://sp.example.org/shibboleth";
const ASSERTION: &[u8] = b"<saml:Assertion ID=\"_d71a3a8e9fcc45c9e9d248ef7049393fc8f04e5f75\">\
<saml:Issuer>https://idp.example.org/idp/shibboleth</saml:Issuer></saml:Assertion>";

/// The SP's encryption key pair: public half for the IdP, both halves for
/// the SP itself.
fn sp_encryption_keys() -> anyhow::Result<(Arc<Credential>, Credential)> {
    let pair = RsaKeyTransportPair::generate()?;
    let public = Credential::from_public_key(pair.public_key_spki().to_vec())?.with_entity_id(SP);
    let private = public.clone().with_private_key(pair.private_key_pkcs8().to_vec())?;
    Ok((Arc::new(public), private))
}

/// An assertion encrypted for the SP with configured defaults, keys
/// detached as siblings of the data.
#[test]
fn test_encrypted_assertion_with_sibling_keys() -> anyhow::Result<()> {
    let config = EncryptionConfig::default();
    let (sp_public, sp_private) = sp_encryption_keys()?;

    let params = EncryptionParameters::from_config(&config);
    let kek = KeyEncryptionParameters::from_config(&config, sp_public).with_recipient(SP);
    let data = Encrypter::new().encrypt_element(ASSERTION, &params, &[kek])?;
    assert_eq!(data.encryption_method, block_encryption_algorithms::AES256_GCM);

    let element = EncryptedElement::new(data).with_detached_keys();
    assert_eq!(element.encrypted_keys.len(), 1);

    let decrypter = Decrypter::new()
        .with_kek_resolver(Arc::new(StaticCredentialResolver::new([sp_private])))
        .with_recipient(SP);
    assert_eq!(decrypter.decrypt_element(&element)?, ASSERTION);

    Ok(())
}

/// One assertion readable by two SPs, each with its own key transport key;
/// the resolver chain finds keys wherever they were placed.
#[test]
fn test_multiple_recipients() -> anyhow::Result<()> {
    let (sp1_public, sp1_private) = sp_encryption_keys()?;
    let (sp2_public, sp2_private) = sp_encryption_keys()?;

    let params = EncryptionParameters::new(block_encryption_algorithms::AES128_GCM);
    let keks = [
        KeyEncryptionParameters::from_config(&EncryptionConfig::default(), sp1_public)
            .with_recipient("https://sp1.example.org"),
        KeyEncryptionParameters::from_config(&EncryptionConfig::default(), sp2_public)
            .with_recipient("https://sp2.example.org"),
    ];
    let element = EncryptedElement::new(Encrypter::new().encrypt_element(ASSERTION, &params, &keks)?)
        .with_detached_keys();

    for (recipient, private) in [
        ("https://sp1.example.org", sp1_private),
        ("https://sp2.example.org", sp2_private),
    ] {
        let resolver = ChainingEncryptedKeyResolver::default()
            .with(Arc::new(InlineEncryptedKeyResolver))
            .with(Arc::new(RetrievalMethodEncryptedKeyResolver::new(
                element.encrypted_keys.clone(),
            )));
        let decrypter = Decrypter::new()
            .with_kek_resolver(Arc::new(StaticCredentialResolver::new([private])))
            .with_encrypted_key_resolver(Arc::new(resolver))
            .with_recipient(recipient);
        assert_eq!(decrypter.decrypt_data(&element.encrypted_data)?, ASSERTION);
    }

    Ok(())
}

/// A third party holding neither key learns nothing.
#[test]
fn test_wrong_key_cannot_decrypt() -> anyhow::Result<()> {
    let (sp_public, _) = sp_encryption_keys()?;
    let (_, eavesdropper) = sp_encryption_keys()?;

    let params = EncryptionParameters::from_config(&EncryptionConfig::default());
    let kek = KeyEncryptionParameters::from_config(&EncryptionConfig::default(), sp_public);
    let data = Encrypter::new().encrypt_element(ASSERTION, &params, &[kek])?;

    let decrypter =
        Decrypter::new().with_kek_resolver(Arc::new(StaticCredentialResolver::new([eavesdropper])));
    assert!(matches!(
        decrypter.decrypt_data(&data),
        Err(SecurityError::DecryptionFailed(_))
    ));

    Ok(())
}
