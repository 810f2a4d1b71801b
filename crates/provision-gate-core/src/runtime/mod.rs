// crates/provision-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Provision Gate Runtime
// Description: Resolver, gate orchestration, and default collaborators.
// Purpose: Execute artifact requests against a catalog and usage policy.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement artifact resolution and the provision gate, plus
//! the in-memory catalog, connector envelope builder, and audit sinks hosts
//! can use directly.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod catalog;
pub mod envelope;
pub mod gate;
pub mod resolver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditLevel;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ProvisionAuditEvent;
pub use audit::ProvisionAuditEventParams;
pub use audit::ProvisionAuditSink;
pub use audit::StderrAuditSink;
pub use catalog::InMemoryCatalog;
pub use envelope::ConnectorEnvelopeBuilder;
pub use envelope::ConnectorIdentity;
pub use envelope::FixedClock;
pub use envelope::StaticTokenProvider;
pub use envelope::SystemClock;
pub use gate::ProvisionError;
pub use gate::ProvisionGate;
pub use gate::ProvisionStage;
pub use gate::classify;
pub use resolver::ResourceResolver;
pub use resolver::resolve_owner;
