// crates/provision-gate-core/src/core/message.rs
// ============================================================================
// Module: Provision Gate Messages
// Description: Artifact requests, response headers, and typed responses.
// Purpose: Define the in-memory values exchanged with the transport layer.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The transport hands the gate an [`ArtifactRequest`] whose requester has
//! already been authenticated. The gate answers with a [`ProvisionResponse`]
//! that always carries a [`ResponseHeader`] built before resolution began, so
//! the correlation identifier survives every failure path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ArtifactId;
use crate::core::identifiers::ConnectorId;
use crate::core::identifiers::CorrelationId;
use crate::core::identifiers::Locator;
use crate::core::identifiers::ResourceId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Incoming request for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRequest {
    /// Request message identifier; echoed as the response correlation id.
    pub message_id: CorrelationId,
    /// Connector that issued the request.
    pub issuer_connector: ConnectorId,
    /// Locator of the requested artifact.
    pub requested_artifact: Locator,
    /// Contract the requester refers to, if any.
    #[serde(default)]
    pub transfer_contract: Option<Locator>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Outward response header.
///
/// # Invariants
/// - Built exactly once per request, before artifact resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    /// Identifier of the request message this responds to.
    pub correlation_message: CorrelationId,
    /// Issue time of the response.
    pub issued: Timestamp,
    /// Connector issuing the response.
    pub issuer_connector: ConnectorId,
    /// Agent sending the response.
    pub sender_agent: ConnectorId,
    /// Connectors receiving the response.
    pub recipient_connectors: Vec<ConnectorId>,
    /// Information model version spoken by the issuer.
    pub model_version: String,
    /// Opaque security token attached by the token provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,
}

/// Rejection reasons surfaced to requesters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// The artifact is unknown to this connector.
    NotFound,
    /// Usage policy forbids provision to this requester.
    NotAuthorized,
    /// Policy evaluation or data retrieval failed.
    InternalRecipientError,
}

impl RejectionReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::NotAuthorized => "not_authorized",
            Self::InternalRecipientError => "internal_recipient_error",
        }
    }
}

/// Gate response: the artifact payload or a typed rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvisionResponse {
    /// Artifact data released to the requester.
    Artifact {
        /// Response header.
        header: ResponseHeader,
        /// Raw artifact bytes.
        payload: Vec<u8>,
    },
    /// Request rejected.
    Rejection {
        /// Response header.
        header: ResponseHeader,
        /// Rejection classification.
        reason: RejectionReason,
        /// Free-text explanation.
        message: String,
    },
}

impl ProvisionResponse {
    /// Returns the response header.
    #[must_use]
    pub const fn header(&self) -> &ResponseHeader {
        match self {
            Self::Artifact {
                header, ..
            }
            | Self::Rejection {
                header, ..
            } => header,
        }
    }

    /// Returns the payload for successful responses.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Artifact {
                payload, ..
            } => Some(payload),
            Self::Rejection {
                ..
            } => None,
        }
    }

    /// Returns the rejection reason for rejected responses.
    #[must_use]
    pub const fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            Self::Artifact {
                ..
            } => None,
            Self::Rejection {
                reason, ..
            } => Some(*reason),
        }
    }

    /// Returns the rejection message for rejected responses.
    #[must_use]
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            Self::Artifact {
                ..
            } => None,
            Self::Rejection {
                message, ..
            } => Some(message),
        }
    }

    /// Returns the outcome classification of this response.
    #[must_use]
    pub const fn outcome(&self) -> ProvisionOutcome {
        match self {
            Self::Artifact {
                ..
            } => ProvisionOutcome::Success,
            Self::Rejection {
                reason, ..
            } => ProvisionOutcome::from_rejection(*reason),
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Terminal outcome of one provision request.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionOutcome {
    /// Data released.
    Success,
    /// Artifact unknown or catalog lookup failed.
    NotFound,
    /// Usage policy denied provision.
    NotAuthorized,
    /// Policy evaluation or data fetch failed.
    InternalError,
}

impl ProvisionOutcome {
    /// Maps a rejection reason onto its outcome.
    #[must_use]
    pub const fn from_rejection(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::NotFound => Self::NotFound,
            RejectionReason::NotAuthorized => Self::NotAuthorized,
            RejectionReason::InternalRecipientError => Self::InternalError,
        }
    }

    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::NotAuthorized => "not_authorized",
            Self::InternalError => "internal_error",
        }
    }

    /// Returns true for every outcome except success.
    #[must_use]
    pub const fn is_rejection(self) -> bool {
        !matches!(self, Self::Success)
    }
}

// ============================================================================
// SECTION: Provision Events
// ============================================================================

/// Fact presented to usage policy evaluation: data is about to be released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionEvent {
    /// Connector that will receive the data.
    pub requester: ConnectorId,
    /// Requested artifact.
    pub artifact_id: ArtifactId,
    /// Resource owning the artifact.
    pub resource_id: ResourceId,
    /// Issue time of the response header.
    pub at: Timestamp,
}
