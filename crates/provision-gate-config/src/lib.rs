// crates/provision-gate-config/src/lib.rs
// ============================================================================
// Module: Provision Gate Config Library
// Description: Config model, validation, catalog seeding, and usage control.
// Purpose: Single source of truth for provision-gate.toml semantics.
// Dependencies: provision-gate-core, serde, toml, time
// ============================================================================

//! ## Overview
//! `provision-gate-config` loads `provision-gate.toml`, validates it fail
//! closed, and turns it into the collaborators a
//! [`ProvisionGate`](provision_gate_core::ProvisionGate) needs: a seeded
//! catalog, a usage policy evaluator, an audit sink, and an envelope builder.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod policy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use policy::*;
