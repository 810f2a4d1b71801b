// crates/provision-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared catalogs, evaluators, and sinks for gate tests.
// Purpose: Provide reusable, deterministic collaborators for provision tests.
// Dependencies: provision-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Fixtures here stand in for the external collaborators of the gate: a
//! scripted usage policy evaluator, a catalog wrapper that injects failures,
//! an envelope builder that counts calls, and an audit sink that keeps events
//! in memory.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use provision_gate_core::ArtifactId;
use provision_gate_core::ArtifactRequest;
use provision_gate_core::CatalogError;
use provision_gate_core::ConnectorEnvelopeBuilder;
use provision_gate_core::ConnectorId;
use provision_gate_core::ConnectorIdentity;
use provision_gate_core::CorrelationId;
use provision_gate_core::EnvelopeBuilder;
use provision_gate_core::FixedClock;
use provision_gate_core::InMemoryCatalog;
use provision_gate_core::Locator;
use provision_gate_core::PolicyError;
use provision_gate_core::ProvisionAuditEvent;
use provision_gate_core::ProvisionAuditSink;
use provision_gate_core::ProvisionEvent;
use provision_gate_core::Representation;
use provision_gate_core::Resource;
use provision_gate_core::ResourceCatalog;
use provision_gate_core::ResourceId;
use provision_gate_core::ResourceMetadata;
use provision_gate_core::ResponseHeader;
use provision_gate_core::StaticTokenProvider;
use provision_gate_core::Timestamp;
use provision_gate_core::UsagePolicy;
use provision_gate_core::UsagePolicyEvaluator;
use serde_json::json;

// ============================================================================
// SECTION: Locators
// ============================================================================

/// Artifact id used by the end-to-end scenarios.
pub const SCENARIO_ARTIFACT: &str = "123e4567-e89b-12d3-a456-426614174000";
/// Local connector locator.
pub const LOCAL_CONNECTOR: &str = "https://provider.example/connectors/1";
/// Requesting connector locator.
pub const REMOTE_CONNECTOR: &str = "https://consumer.example/connectors/7";
/// Request message identifier used by `request_for`.
pub const MESSAGE_ID: &str = "https://consumer.example/messages/42";
/// Fixed issue time used by the test envelope builder.
pub const ISSUED_AT: Timestamp = Timestamp::UnixMillis(1_700_000_000_000);

/// Builds a resource locator around a UUID.
pub fn resource_locator(uuid: &str) -> Locator {
    Locator::new(format!("https://provider.example/api/resources/{uuid}"))
}

/// Builds a representation locator around a UUID.
pub fn representation_locator(uuid: &str) -> Locator {
    Locator::new(format!("https://provider.example/api/representations/{uuid}"))
}

/// Builds an artifact request locator around a UUID.
pub fn artifact_locator(uuid: &str) -> Locator {
    Locator::new(format!("https://provider.example/api/artifacts/{uuid}"))
}

/// Parses a UUID string into an artifact id.
pub fn artifact_id(uuid: &str) -> Result<ArtifactId, Box<dyn std::error::Error>> {
    Ok(ArtifactId::from_locator(&Locator::new(uuid))?)
}

/// Builds an artifact request with a fixed message id.
pub fn request_for(locator: Locator) -> ArtifactRequest {
    ArtifactRequest {
        message_id: CorrelationId::new(MESSAGE_ID),
        issuer_connector: ConnectorId::new(REMOTE_CONNECTOR),
        requested_artifact: locator,
        transfer_contract: None,
    }
}

// ============================================================================
// SECTION: Catalog Fixtures
// ============================================================================

/// Metadata carrying the given policy document.
pub fn metadata_with_policy(policy: serde_json::Value) -> ResourceMetadata {
    ResourceMetadata {
        title: "weather readings".to_string(),
        description: None,
        keywords: vec!["weather".to_string()],
        owner: None,
        policy: UsagePolicy::new(policy),
    }
}

/// Inserts one resource offering each listed representation with its data.
pub fn insert_resource(
    catalog: &InMemoryCatalog,
    resource_uuid: &str,
    representations: &[(&str, &[u8])],
) -> Result<ResourceId, Box<dyn std::error::Error>> {
    let resource = Resource::new(
        resource_locator(resource_uuid),
        representations
            .iter()
            .map(|(uuid, _)| Representation::new(representation_locator(uuid)))
            .collect(),
    );
    let mut data = Vec::new();
    for (uuid, bytes) in representations {
        data.push((artifact_id(uuid)?, bytes.to_vec()));
    }
    let id =
        catalog.insert(resource, metadata_with_policy(json!({"pattern": "provide_access"})), data)?;
    Ok(id)
}

/// Which catalog call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    /// Resource listing.
    Listing,
    /// Metadata lookup.
    Metadata,
    /// Data retrieval.
    Data,
}

/// Catalog wrapper that fails one kind of call.
#[derive(Debug, Clone)]
pub struct FailingCatalog {
    pub inner: InMemoryCatalog,
    pub fail_on: FailOn,
}

impl ResourceCatalog for FailingCatalog {
    fn list_resources(&self) -> Result<Vec<Resource>, CatalogError> {
        if self.fail_on == FailOn::Listing {
            return Err(CatalogError::Unavailable("listing backend offline".to_string()));
        }
        self.inner.list_resources()
    }

    fn metadata(&self, resource_id: &ResourceId) -> Result<ResourceMetadata, CatalogError> {
        if self.fail_on == FailOn::Metadata {
            return Err(CatalogError::Unavailable("metadata backend offline".to_string()));
        }
        self.inner.metadata(resource_id)
    }

    fn data(
        &self,
        resource_id: &ResourceId,
        artifact_id: &ArtifactId,
    ) -> Result<Vec<u8>, CatalogError> {
        if self.fail_on == FailOn::Data {
            return Err(CatalogError::Data("disk read failed".to_string()));
        }
        self.inner.data(resource_id, artifact_id)
    }
}

// ============================================================================
// SECTION: Policy Fixtures
// ============================================================================

/// Scripted evaluator answer.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Permit provision.
    Permit,
    /// Deny provision; `describe` returns the text.
    Deny(String),
    /// Fail evaluation with the message.
    Fail(String),
}

/// Evaluator returning a scripted verdict and recording the events it saw.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    verdict: Verdict,
    events: Arc<Mutex<Vec<ProvisionEvent>>>,
}

impl ScriptedPolicy {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<ProvisionEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl UsagePolicyEvaluator for ScriptedPolicy {
    fn permits(&self, _policy: &UsagePolicy, event: &ProvisionEvent) -> Result<bool, PolicyError> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        match &self.verdict {
            Verdict::Permit => Ok(true),
            Verdict::Deny(_) => Ok(false),
            Verdict::Fail(message) => Err(PolicyError::Evaluation(message.clone())),
        }
    }

    fn describe(&self, _policy: &UsagePolicy) -> String {
        match &self.verdict {
            Verdict::Deny(description) => description.clone(),
            Verdict::Permit | Verdict::Fail(_) => "provide access".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Envelope Fixtures
// ============================================================================

/// Default envelope builder with a fixed clock and token.
pub type TestEnvelope = ConnectorEnvelopeBuilder<StaticTokenProvider, FixedClock>;

/// Builds the default test envelope builder.
pub fn test_envelope() -> TestEnvelope {
    ConnectorEnvelopeBuilder::new(
        ConnectorIdentity {
            id: ConnectorId::new(LOCAL_CONNECTOR),
            model_version: "4.0.0".to_string(),
        },
        StaticTokenProvider::new(Some("token-abc".to_string())),
        FixedClock(ISSUED_AT),
    )
}

/// Envelope builder wrapper counting `build` calls.
#[derive(Debug, Clone)]
pub struct CountingEnvelope {
    inner: TestEnvelope,
    calls: Arc<AtomicUsize>,
}

impl CountingEnvelope {
    pub fn new() -> Self {
        Self {
            inner: test_envelope(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EnvelopeBuilder for CountingEnvelope {
    fn build(&self, request: &ArtifactRequest) -> ResponseHeader {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.build(request)
    }
}

// ============================================================================
// SECTION: Audit Fixtures
// ============================================================================

/// Audit sink keeping events in memory.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<ProvisionAuditEvent>>,
}

impl RecordingAuditSink {
    pub fn events(&self) -> Vec<ProvisionAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ProvisionAuditSink for RecordingAuditSink {
    fn record(&self, event: &ProvisionAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
