//! Security audit events.
//!
//! ## NIST 800-53 Rev5: AU-2 (Event Logging)
//!
//! Trust decisions, replay detections and decryption failures are recorded
//! as structured events.
//!
//! ## NIST 800-53 Rev5: AU-3 (Content of Audit Records)
//!
//! All events include:
//! - Timestamp (ISO 8601)
//! - Event type
//! - Outcome (success/failure)
//! - Entity identity (when available)
//! - Free-form details

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tracing target used for audit output.
pub const AUDIT_TARGET: &str = "fedsec::audit";

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Signature events
    /// A signature was evaluated by a trust engine.
    SignatureTrustEvaluation,

    // Replay events
    /// A message identifier was checked against the replay cache.
    ReplayCheck,

    // Authentication events
    /// A client TLS certificate was evaluated.
    ClientCertAuthentication,

    // Encryption events
    /// An `EncryptedData` was decrypted.
    Decryption,
    /// An `EncryptedData` was produced.
    Encryption,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Entity ID of the peer, if known.
    pub entity_id: Option<String>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl SecurityEvent {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> SecurityEventBuilder {
        SecurityEventBuilder::new(event_type)
    }

    /// Writes the event to the audit tracing target.
    pub fn emit(&self) {
        let payload = serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        match self.outcome {
            EventOutcome::Success => {
                tracing::info!(target: AUDIT_TARGET, event_type = ?self.event_type, "{payload}");
            }
            EventOutcome::Failure => {
                tracing::warn!(target: AUDIT_TARGET, event_type = ?self.event_type, "{payload}");
            }
        }
    }
}

/// Builder for creating events.
pub struct SecurityEventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    entity_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl SecurityEventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            entity_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the peer entity ID.
    #[must_use]
    pub fn entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> SecurityEvent {
        SecurityEvent {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            entity_id: self.entity_id,
            error: self.error,
            details: self.details,
        }
    }

    /// Builds and emits the event.
    pub fn emit(self) {
        self.build().emit();
    }
}
