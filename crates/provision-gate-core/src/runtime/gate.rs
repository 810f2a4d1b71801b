// crates/provision-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Provision Gate
// Description: Single-pass orchestration of one artifact request.
// Purpose: Release artifact data only when usage policy permits, and classify
//          every failure into a typed rejection.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{audit, resolver}
// ============================================================================

//! ## Overview
//! The gate handles one request per call and keeps no state between calls:
//!
//! 1. Build the response header. This always happens first so the
//!    correlation identifier is present on every response, including
//!    rejections.
//! 2. Extract the artifact UUID, resolve the owning resource, and load its
//!    metadata. Any failure here is `not_found`.
//! 3. Evaluate the usage policy. An evaluation error is an internal error; a
//!    deny is `not_authorized` with the policy description attached.
//! 4. Load the artifact data. Failure is an internal error.
//!
//! Each step returns a [`ProvisionError`] tagged with the step that failed.
//! [`classify`] maps that error onto a [`RejectionReason`] without inspecting
//! anything else, and no error leaves [`ProvisionGate::handle`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::core::ArtifactId;
use crate::core::ArtifactRequest;
use crate::core::IdentifierError;
use crate::core::Locator;
use crate::core::ProvisionEvent;
use crate::core::ProvisionResponse;
use crate::core::RejectionReason;
use crate::core::ResourceId;
use crate::core::Timestamp;
use crate::interfaces::CatalogError;
use crate::interfaces::EnvelopeBuilder;
use crate::interfaces::PolicyError;
use crate::interfaces::ResourceCatalog;
use crate::interfaces::UsagePolicyEvaluator;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::ProvisionAuditEvent;
use crate::runtime::audit::ProvisionAuditEventParams;
use crate::runtime::audit::ProvisionAuditSink;
use crate::runtime::resolver::ResourceResolver;

// ============================================================================
// SECTION: Stages
// ============================================================================

/// Step of the provision pipeline that decided an outcome.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStage {
    /// A locator held no usable UUID.
    Identifier,
    /// The resource listing could not be read.
    CatalogListing,
    /// No resource offers the artifact.
    Resolve,
    /// Resource metadata could not be loaded.
    Metadata,
    /// Usage policy evaluation.
    Policy,
    /// Artifact data retrieval.
    Data,
    /// All steps passed.
    Complete,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Step failures raised while provisioning an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// A locator held no usable UUID.
    #[error(transparent)]
    Identifier(IdentifierError),
    /// The resource listing could not be read.
    #[error("resource listing failed: {0}")]
    Listing(CatalogError),
    /// No resource offers the artifact.
    #[error("no resource offers artifact {0}")]
    Unresolved(ArtifactId),
    /// Resource metadata could not be loaded.
    #[error("resource metadata unavailable: {0}")]
    Metadata(CatalogError),
    /// Usage policy evaluation failed.
    #[error(transparent)]
    Policy(PolicyError),
    /// Usage policy denied provision.
    #[error("policy restriction detected: {description}")]
    Denied {
        /// Description of the governing policy rule.
        description: String,
    },
    /// Artifact data could not be loaded.
    #[error("artifact data unavailable: {0}")]
    Data(CatalogError),
}

impl ProvisionError {
    /// Returns the step that raised this error.
    #[must_use]
    pub const fn stage(&self) -> ProvisionStage {
        match self {
            Self::Identifier(_) => ProvisionStage::Identifier,
            Self::Listing(_) => ProvisionStage::CatalogListing,
            Self::Unresolved(_) => ProvisionStage::Resolve,
            Self::Metadata(_) => ProvisionStage::Metadata,
            Self::Policy(_)
            | Self::Denied {
                ..
            } => ProvisionStage::Policy,
            Self::Data(_) => ProvisionStage::Data,
        }
    }

    /// Returns the rejection text sent to the requester.
    #[must_use]
    pub fn rejection_message(&self) -> String {
        match classify(self) {
            RejectionReason::NotFound => {
                format!("artifact is not known to this connector: {self}")
            }
            RejectionReason::NotAuthorized | RejectionReason::InternalRecipientError => {
                self.to_string()
            }
        }
    }
}

/// Maps a step failure onto the rejection reason shown to requesters.
#[must_use]
pub const fn classify(error: &ProvisionError) -> RejectionReason {
    match error {
        ProvisionError::Identifier(_)
        | ProvisionError::Listing(_)
        | ProvisionError::Unresolved(_)
        | ProvisionError::Metadata(_) => RejectionReason::NotFound,
        ProvisionError::Denied {
            ..
        } => RejectionReason::NotAuthorized,
        ProvisionError::Policy(_) | ProvisionError::Data(_) => {
            RejectionReason::InternalRecipientError
        }
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Data released by a successful provision.
struct Provisioned {
    /// Artifact bytes.
    payload: Vec<u8>,
}

/// Progress recorded while a request moves through the pipeline.
#[derive(Default)]
struct Trace {
    /// Resource locator once resolution succeeded.
    resource: Option<Locator>,
}

/// Request gate releasing artifact data under usage control.
pub struct ProvisionGate<C, P, E> {
    /// Read-only resource catalog.
    catalog: C,
    /// Usage policy evaluator.
    evaluator: P,
    /// Response header builder.
    envelope: E,
    /// Audit sink for request outcomes.
    audit: Arc<dyn ProvisionAuditSink>,
}

impl<C, P, E> ProvisionGate<C, P, E>
where
    C: ResourceCatalog,
    P: UsagePolicyEvaluator,
    E: EnvelopeBuilder,
{
    /// Creates a gate that discards audit events.
    #[must_use]
    pub fn new(catalog: C, evaluator: P, envelope: E) -> Self {
        Self {
            catalog,
            evaluator,
            envelope,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ProvisionAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Handles one artifact request.
    ///
    /// Never fails: every step failure becomes a rejection response.
    pub fn handle(&self, request: &ArtifactRequest) -> ProvisionResponse {
        let header = self.envelope.build(request);
        let mut trace = Trace::default();
        let result = self.provision(request, header.issued, &mut trace);

        let (response, stage, message) = match result {
            Ok(provisioned) => {
                let message = format!("released {} bytes", provisioned.payload.len());
                let response = ProvisionResponse::Artifact {
                    header,
                    payload: provisioned.payload,
                };
                (response, ProvisionStage::Complete, message)
            }
            Err(error) => {
                let log_message = match classify(&error) {
                    RejectionReason::NotFound => format!("resource not found: {error}"),
                    RejectionReason::NotAuthorized | RejectionReason::InternalRecipientError => {
                        error.to_string()
                    }
                };
                let response = ProvisionResponse::Rejection {
                    header,
                    reason: classify(&error),
                    message: error.rejection_message(),
                };
                (response, error.stage(), log_message)
            }
        };

        self.record(request, &response, stage, trace.resource, message);
        response
    }

    /// Runs resolution, policy evaluation, and data retrieval.
    fn provision(
        &self,
        request: &ArtifactRequest,
        issued: Timestamp,
        trace: &mut Trace,
    ) -> Result<Provisioned, ProvisionError> {
        let artifact_id = ArtifactId::from_locator(&request.requested_artifact)
            .map_err(ProvisionError::Identifier)?;
        let resource = ResourceResolver::new(&self.catalog)
            .resolve(&artifact_id)
            .map_err(ProvisionError::Listing)?
            .ok_or(ProvisionError::Unresolved(artifact_id))?;
        let resource_id = ResourceId::from_locator(&resource);
        trace.resource = Some(resource);
        let resource_id = resource_id.map_err(ProvisionError::Identifier)?;
        let metadata = self.catalog.metadata(&resource_id).map_err(ProvisionError::Metadata)?;

        let event = ProvisionEvent {
            requester: request.issuer_connector.clone(),
            artifact_id,
            resource_id,
            at: issued,
        };
        let permitted =
            self.evaluator.permits(&metadata.policy, &event).map_err(ProvisionError::Policy)?;
        if !permitted {
            return Err(ProvisionError::Denied {
                description: self.evaluator.describe(&metadata.policy),
            });
        }

        // Data is addressed by the requested artifact, not by the resource.
        let payload =
            self.catalog.data(&resource_id, &artifact_id).map_err(ProvisionError::Data)?;
        Ok(Provisioned {
            payload,
        })
    }

    /// Emits the audit event for a finished request.
    fn record(
        &self,
        request: &ArtifactRequest,
        response: &ProvisionResponse,
        stage: ProvisionStage,
        resource: Option<Locator>,
        message: String,
    ) {
        let event = ProvisionAuditEvent::new(ProvisionAuditEventParams {
            outcome: response.outcome(),
            stage,
            correlation_id: response.header().correlation_message.clone(),
            requester: request.issuer_connector.clone(),
            artifact: request.requested_artifact.clone(),
            resource,
            message,
            payload_bytes: response.payload().map_or(0, <[u8]>::len),
        });
        self.audit.record(&event);
    }
}
