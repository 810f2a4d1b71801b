// crates/provision-gate-core/src/core/mod.rs
// ============================================================================
// Module: Provision Gate Core Types
// Description: Identifiers, resource records, messages, and time values.
// Purpose: Provide stable, serializable types shared by the gate and its hosts.
// Dependencies: regex, serde, uuid
// ============================================================================

//! ## Overview
//! Core types describe what the gate reads (resources, metadata, policies) and
//! what it exchanges with the transport (requests, headers, responses).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod message;
pub mod resource;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::ArtifactId;
pub use identifiers::ConnectorId;
pub use identifiers::CorrelationId;
pub use identifiers::IdentifierError;
pub use identifiers::Locator;
pub use identifiers::ResourceId;
pub use identifiers::extract_uuid;
pub use message::ArtifactRequest;
pub use message::ProvisionEvent;
pub use message::ProvisionOutcome;
pub use message::ProvisionResponse;
pub use message::RejectionReason;
pub use message::ResponseHeader;
pub use resource::Representation;
pub use resource::Resource;
pub use resource::ResourceMetadata;
pub use resource::UsagePolicy;
pub use time::Timestamp;
