// crates/provision-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Provision Gate Interfaces
// Description: Contracts for the catalog, usage policy, envelope, and clock.
// Purpose: Define the collaborator surfaces the provision gate calls into.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The gate owns no storage, policy language, or message format. It reaches
//! them through the traits in this module. Every fallible call returns an
//! explicit error type so the gate can classify the failure at the boundary
//! where it happened.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ArtifactId;
use crate::core::ArtifactRequest;
use crate::core::ProvisionEvent;
use crate::core::Resource;
use crate::core::ResourceId;
use crate::core::ResourceMetadata;
use crate::core::ResponseHeader;
use crate::core::Timestamp;
use crate::core::UsagePolicy;

// ============================================================================
// SECTION: Resource Catalog
// ============================================================================

/// Resource catalog errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog holds no record for the identifier.
    #[error("catalog entry not found: {0}")]
    NotFound(String),
    /// The catalog backend could not be reached or read.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    /// Stored data for the artifact could not be produced.
    #[error("catalog data error: {0}")]
    Data(String),
}

/// Read-only resource catalog.
///
/// Implementations must tolerate concurrent reads; the gate never writes.
pub trait ResourceCatalog {
    /// Lists every offered resource in a stable traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the listing cannot be read.
    fn list_resources(&self) -> Result<Vec<Resource>, CatalogError>;

    /// Loads metadata, including the usage policy, for a resource.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the resource is unknown or unreadable.
    fn metadata(&self, resource_id: &ResourceId) -> Result<ResourceMetadata, CatalogError>;

    /// Loads the data of one artifact of a resource.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the data cannot be produced.
    fn data(
        &self,
        resource_id: &ResourceId,
        artifact_id: &ArtifactId,
    ) -> Result<Vec<u8>, CatalogError>;
}

// ============================================================================
// SECTION: Usage Policy Evaluator
// ============================================================================

/// Usage policy evaluation errors.
///
/// These are failures of evaluation itself, never a denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The policy document could not be understood.
    #[error("malformed usage policy: {0}")]
    Malformed(String),
    /// The evaluator failed while evaluating a well-formed policy.
    #[error("usage policy evaluation failed: {0}")]
    Evaluation(String),
}

/// Evaluates usage policies against provision events.
pub trait UsagePolicyEvaluator {
    /// Returns whether the policy permits releasing data for the event.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the policy cannot be evaluated.
    fn permits(&self, policy: &UsagePolicy, event: &ProvisionEvent) -> Result<bool, PolicyError>;

    /// Renders a human-readable description of the governing rule.
    fn describe(&self, policy: &UsagePolicy) -> String;
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Builds outward response headers.
///
/// Building is infallible and independent of how resolution turns out.
pub trait EnvelopeBuilder {
    /// Builds the response header for a request.
    fn build(&self, request: &ArtifactRequest) -> ResponseHeader;
}

/// Supplies the opaque security token attached to response headers.
pub trait TokenProvider {
    /// Returns the current token, if one is available.
    fn token(&self) -> Option<String>;
}

/// Source of issue timestamps for response headers.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}
