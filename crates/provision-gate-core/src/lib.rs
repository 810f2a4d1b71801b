// crates/provision-gate-core/src/lib.rs
// ============================================================================
// Module: Provision Gate Core Library
// Description: Public API surface for the provision gate core.
// Purpose: Expose core types, collaborator interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Provision gate core answers one question per artifact request: may this
//! requester receive this data now, and if so, what is it. It resolves the
//! requested artifact to the resource that offers it, evaluates that
//! resource's usage policy, and returns either the data or a typed rejection.
//! Storage, policy language, and message transport stay behind the traits in
//! [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::CatalogError;
pub use interfaces::Clock;
pub use interfaces::EnvelopeBuilder;
pub use interfaces::PolicyError;
pub use interfaces::ResourceCatalog;
pub use interfaces::TokenProvider;
pub use interfaces::UsagePolicyEvaluator;
pub use runtime::ConnectorEnvelopeBuilder;
pub use runtime::ConnectorIdentity;
pub use runtime::FixedClock;
pub use runtime::InMemoryCatalog;
pub use runtime::ProvisionAuditEvent;
pub use runtime::ProvisionAuditSink;
pub use runtime::ProvisionError;
pub use runtime::ProvisionGate;
pub use runtime::ProvisionStage;
pub use runtime::ResourceResolver;
pub use runtime::StaticTokenProvider;
pub use runtime::SystemClock;
