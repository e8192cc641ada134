//! Client TLS certificate authentication.

use std::sync::Arc;

use fedsec_core::event::{EventType, SecurityEvent};
use x509_parser::extensions::GeneralName;
use x509_parser::prelude::{FromDer, ParsedExtension, X509Certificate};

use super::CredentialTrustEngine;
use crate::credential::{Credential, CriteriaSet, UsageType};
use crate::error::{SecurityError, SecurityResult};

/// Per-message state the rule reads and updates.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    /// Issuer claimed by the inbound message, if any.
    pub inbound_issuer: Option<String>,
    /// Credential presented by the TLS peer.
    pub peer_credential: Option<Arc<Credential>>,
    /// Set once the issuer is authenticated.
    pub issuer_authenticated: bool,
}

impl MessageContext {
    /// Creates a context for a TLS peer credential.
    #[must_use]
    pub fn with_peer(peer_credential: Arc<Credential>) -> Self {
        Self {
            peer_credential: Some(peer_credential),
            ..Self::default()
        }
    }

    /// Sets the claimed issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.inbound_issuer = Some(issuer.into());
        self
    }
}

/// Which certificate names are tried as issuer candidates.
///
/// Names are derived in field order: subject CN, subject DN, DNS SANs,
/// URI SANs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateNameOptions {
    /// Try the subject common name.
    pub subject_common_name: bool,
    /// Try the full subject DN.
    pub subject_dn: bool,
    /// Try DNS subjectAltNames.
    pub dns_alt_names: bool,
    /// Try URI subjectAltNames.
    pub uri_alt_names: bool,
}

impl Default for CertificateNameOptions {
    fn default() -> Self {
        Self {
            subject_common_name: true,
            subject_dn: false,
            dns_alt_names: true,
            uri_alt_names: true,
        }
    }
}

impl CertificateNameOptions {
    /// Every name source enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            subject_common_name: true,
            subject_dn: true,
            dns_alt_names: true,
            uri_alt_names: true,
        }
    }
}

/// Collects the names `options` selects from `cert`, without duplicates.
pub(crate) fn certificate_names(
    cert: &X509Certificate<'_>,
    options: &CertificateNameOptions,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut push = |name: String| {
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    };

    if options.subject_common_name {
        for cn in cert.subject().iter_common_name() {
            if let Ok(cn) = cn.as_str() {
                push(cn.to_string());
            }
        }
    }
    if options.subject_dn {
        push(cert.subject().to_string());
    }
    if options.dns_alt_names || options.uri_alt_names {
        for ext in cert.extensions() {
            let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() else {
                continue;
            };
            for name in &san.general_names {
                match name {
                    GeneralName::DNSName(dns) if options.dns_alt_names => {
                        push((*dns).to_string());
                    }
                    GeneralName::URI(uri) if options.uri_alt_names => {
                        push((*uri).to_string());
                    }
                    _ => {}
                }
            }
        }
    }
    names
}

/// Authenticates a message issuer from the TLS client certificate.
pub struct ClientCertAuthRule {
    engine: Arc<dyn CredentialTrustEngine>,
    name_options: CertificateNameOptions,
}

impl ClientCertAuthRule {
    /// Creates a rule over a credential trust engine.
    #[must_use]
    pub fn new(engine: Arc<dyn CredentialTrustEngine>) -> Self {
        Self {
            engine,
            name_options: CertificateNameOptions::default(),
        }
    }

    /// Sets which certificate names are tried when no issuer is known.
    #[must_use]
    pub const fn with_name_options(mut self, options: CertificateNameOptions) -> Self {
        self.name_options = options;
        self
    }

    /// Evaluates the peer certificate against the message issuer.
    ///
    /// Does nothing without a peer credential.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::PolicyViolation`] if a claimed issuer does
    /// not trust the peer credential, or the engine's error if trust could
    /// not be evaluated.
    pub fn evaluate(&self, context: &mut MessageContext) -> SecurityResult<()> {
        let Some(peer) = context.peer_credential.clone() else {
            tracing::debug!("no client certificate presented");
            return Ok(());
        };

        if let Some(issuer) = context.inbound_issuer.clone() {
            return self.evaluate_known_issuer(context, &peer, &issuer);
        }

        for name in self.derived_names(&peer) {
            if self.is_trusted_for(&peer, &name)? {
                tracing::info!(issuer = %name, "issuer derived from client certificate");
                audit(&name).emit();
                context.inbound_issuer = Some(name);
                context.issuer_authenticated = true;
                return Ok(());
            }
        }

        tracing::debug!("no certificate-derived name is trusted");
        SecurityEvent::builder(EventType::ClientCertAuthentication)
            .failure("no trusted certificate-derived issuer")
            .emit();
        Ok(())
    }

    fn evaluate_known_issuer(
        &self,
        context: &mut MessageContext,
        peer: &Credential,
        issuer: &str,
    ) -> SecurityResult<()> {
        if self.is_trusted_for(peer, issuer)? {
            tracing::debug!(issuer, "client certificate trusted for issuer");
            audit(issuer).emit();
            context.issuer_authenticated = true;
            Ok(())
        } else {
            tracing::warn!(issuer, "client certificate not trusted for issuer");
            audit(issuer)
                .failure("client certificate not trusted")
                .emit();
            Err(SecurityError::PolicyViolation(format!(
                "client certificate is not trusted for {issuer}"
            )))
        }
    }

    fn is_trusted_for(&self, peer: &Credential, entity_id: &str) -> SecurityResult<bool> {
        let criteria = CriteriaSet::for_entity(entity_id).with_usage(UsageType::Signing);
        self.engine.validate_credential(peer, &criteria)
    }

    fn derived_names(&self, peer: &Credential) -> Vec<String> {
        let Some(der) = peer.entity_certificate() else {
            return Vec::new();
        };
        match X509Certificate::from_der(der) {
            Ok((_, cert)) => certificate_names(&cert, &self.name_options),
            Err(e) => {
                tracing::warn!(error = %e, "unparseable client certificate");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for ClientCertAuthRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCertAuthRule")
            .field("name_options", &self.name_options)
            .finish_non_exhaustive()
    }
}

fn audit(issuer: &str) -> fedsec_core::event::SecurityEventBuilder {
    SecurityEvent::builder(EventType::ClientCertAuthentication).entity(issuer)
}
