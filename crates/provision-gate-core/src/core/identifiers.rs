// crates/provision-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Provision Gate Identifiers
// Description: Locators, UUID-backed identifiers, and identifier extraction.
// Purpose: Provide strongly typed IDs and the locator-to-UUID extraction rule.
// Dependencies: regex, serde, uuid
// ============================================================================

//! ## Overview
//! Artifacts and resources are named by locators (URI strings) that embed a
//! UUID somewhere in their text. The UUID is *extracted*, never parsed from
//! the whole string: the identifier is the last UUID-shaped substring found
//! by a left-to-right, non-overlapping scan. Locators themselves are opaque
//! and are never validated as URIs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// UUID shape: 8-4-4-4-12 hexadecimal digits, either case.
static UUID_PATTERN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
});

/// Identifier extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The locator holds no UUID-shaped substring.
    #[error("no uuid found in locator: {0}")]
    Missing(String),
    /// A UUID-shaped substring failed to parse.
    #[error("invalid uuid {value}: {reason}")]
    Invalid {
        /// Matched text.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The UUID pattern could not be compiled.
    #[error("uuid pattern unavailable: {0}")]
    Pattern(String),
}

/// Extracts the last UUID-shaped substring from `text`.
///
/// Matches are found left to right without overlap; when several are present
/// the last one wins.
///
/// # Errors
///
/// Returns [`IdentifierError::Missing`] when no UUID-shaped substring exists.
pub fn extract_uuid(text: &str) -> Result<Uuid, IdentifierError> {
    let pattern = UUID_PATTERN.as_ref().map_err(|err| IdentifierError::Pattern(err.to_string()))?;
    let last = pattern
        .find_iter(text)
        .last()
        .ok_or_else(|| IdentifierError::Missing(text.to_string()))?;
    Uuid::parse_str(last.as_str()).map_err(|err| IdentifierError::Invalid {
        value: last.as_str().to_string(),
        reason: err.to_string(),
    })
}

// ============================================================================
// SECTION: String Identifiers
// ============================================================================

/// Opaque URI-style locator naming a resource, representation, or artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Creates a new locator.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the locator as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the embedded UUID from this locator.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the locator holds no UUID.
    pub fn extract_uuid(&self) -> Result<Uuid, IdentifierError> {
        extract_uuid(&self.0)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Correlation identifier linking a response to its request message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Creates a new correlation identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Connector identifier for senders and recipients of messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorId(String);

impl ConnectorId {
    /// Creates a new connector identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ConnectorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ConnectorId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: UUID Identifiers
// ============================================================================

/// Artifact identifier naming one retrievable unit of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Wraps a UUID as an artifact identifier.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Extracts an artifact identifier from a locator.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the locator holds no UUID.
    pub fn from_locator(locator: &Locator) -> Result<Self, IdentifierError> {
        locator.extract_uuid().map(Self)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ArtifactId {
    fn from(value: Uuid) -> Self {
        Self::new(value)
    }
}

/// Resource identifier used for catalog metadata and data lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Wraps a UUID as a resource identifier.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Extracts a resource identifier from a locator.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the locator holds no UUID.
    pub fn from_locator(locator: &Locator) -> Result<Self, IdentifierError> {
        locator.extract_uuid().map(Self)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ResourceId {
    fn from(value: Uuid) -> Self {
        Self::new(value)
    }
}
