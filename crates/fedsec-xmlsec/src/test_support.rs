//! Certificate fixtures for unit tests.

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
};

use crate::credential::Credential;

/// A DER certificate and its PKCS#8 private key.
pub(crate) struct TestLeaf {
    pub der: Vec<u8>,
    pub pkcs8: Vec<u8>,
}

impl TestLeaf {
    /// Returns a credential holding both the certificate and private key.
    pub fn credential(&self) -> Credential {
        Credential::from_certificate(self.der.clone())
            .unwrap()
            .with_private_key(self.pkcs8.clone())
            .unwrap()
    }
}

/// A certificate authority able to issue further certificates.
pub(crate) struct TestCa {
    cert: Certificate,
    key: KeyPair,
}

fn params(common_name: &str, is_ca: bool) -> CertificateParams {
    let mut params = CertificateParams::new(vec![common_name.to_string()]).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;
    if is_ca {
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    }
    params
}

impl TestCa {
    /// Creates a self-signed root.
    pub fn root(common_name: &str) -> Self {
        let key = KeyPair::generate().unwrap();
        let cert = params(common_name, true).self_signed(&key).unwrap();
        Self { cert, key }
    }

    /// Creates a subordinate CA.
    pub fn intermediate(&self, common_name: &str) -> Self {
        let key = KeyPair::generate().unwrap();
        let cert = params(common_name, true)
            .signed_by(&key, &self.cert, &self.key)
            .unwrap();
        Self { cert, key }
    }

    /// Issues an end-entity certificate whose CN and DNS SAN are `common_name`.
    pub fn issue(&self, common_name: &str) -> TestLeaf {
        let key = KeyPair::generate().unwrap();
        let cert = params(common_name, false)
            .signed_by(&key, &self.cert, &self.key)
            .unwrap();
        TestLeaf {
            der: cert.der().to_vec(),
            pkcs8: key.serialize_der(),
        }
    }

    /// Returns the CA certificate as DER.
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }
}

/// Creates a self-signed end-entity certificate.
pub(crate) fn self_signed(common_name: &str) -> TestLeaf {
    let key = KeyPair::generate().unwrap();
    let cert = params(common_name, false).self_signed(&key).unwrap();
    TestLeaf {
        der: cert.der().to_vec(),
        pkcs8: key.serialize_der(),
    }
}
