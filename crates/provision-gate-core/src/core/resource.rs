// crates/provision-gate-core/src/core/resource.rs
// ============================================================================
// Module: Provision Gate Resource Model
// Description: Resources, representations, metadata, and usage policies.
// Purpose: Describe the read-only catalog records consulted at request time.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Resource`] is the unit a usage policy attaches to. It exposes one or
//! more [`Representation`]s, each carrying its own locator whose embedded UUID
//! is the artifact identifier requesters ask for. The gate reads these records
//! and never mutates them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::Locator;

// ============================================================================
// SECTION: Resources
// ============================================================================

/// Catalog resource owning a set of representations.
///
/// # Invariants
/// - Representation order carries no meaning.
/// - At most one resource in a catalog should own a given representation UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource locator embedding the resource UUID.
    pub id: Locator,
    /// Representations exposed by this resource.
    #[serde(default)]
    pub representations: Vec<Representation>,
}

impl Resource {
    /// Creates a resource with the given representations.
    #[must_use]
    pub fn new(id: impl Into<Locator>, representations: Vec<Representation>) -> Self {
        Self {
            id: id.into(),
            representations,
        }
    }
}

/// A rendition of a resource addressable as an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    /// Representation locator embedding the artifact UUID.
    pub id: Locator,
    /// Media type of the rendition, if declared.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Language of the rendition, if declared.
    #[serde(default)]
    pub language: Option<String>,
}

impl Representation {
    /// Creates a representation with no descriptors.
    #[must_use]
    pub fn new(id: impl Into<Locator>) -> Self {
        Self {
            id: id.into(),
            media_type: None,
            language: None,
        }
    }
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Metadata attached to a resource, including its usage policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    /// Human-readable title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Owning party, if recorded.
    #[serde(default)]
    pub owner: Option<Locator>,
    /// Usage policy evaluated before provision.
    pub policy: UsagePolicy,
}

/// Opaque usage policy document.
///
/// The gate never inspects the document; only a
/// [`UsagePolicyEvaluator`](crate::interfaces::UsagePolicyEvaluator) does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsagePolicy(Value);

impl UsagePolicy {
    /// Wraps a policy document.
    #[must_use]
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// Returns the raw policy document.
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for UsagePolicy {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
