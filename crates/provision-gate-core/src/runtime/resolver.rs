// crates/provision-gate-core/src/runtime/resolver.rs
// ============================================================================
// Module: Resource Resolver
// Description: Maps an artifact identifier to the resource that offers it.
// Purpose: Provide the exhaustive representation scan used by the gate.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Resolution scans every resource in catalog order and every representation
//! of each resource, comparing the UUID embedded in the representation
//! locator with the requested artifact.
//!
//! The scan never stops early. If more than one resource offers the same
//! artifact, the last match in traversal order wins. Catalogs are expected to
//! keep representation identifiers unique; the tie-break only keeps the
//! result deterministic when they do not. Representations whose locator
//! holds no UUID cannot match and are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ArtifactId;
use crate::core::Locator;
use crate::core::Resource;
use crate::interfaces::CatalogError;
use crate::interfaces::ResourceCatalog;

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves artifacts against a borrowed catalog.
#[derive(Debug, Clone, Copy)]
pub struct ResourceResolver<'a, C> {
    /// Catalog providing the resource listing.
    catalog: &'a C,
}

impl<'a, C: ResourceCatalog> ResourceResolver<'a, C> {
    /// Creates a resolver over the catalog.
    #[must_use]
    pub const fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
        }
    }

    /// Returns the locator of the resource offering `artifact_id`.
    ///
    /// `Ok(None)` means no representation matched; it is not an error here.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the resource listing cannot be read.
    pub fn resolve(&self, artifact_id: &ArtifactId) -> Result<Option<Locator>, CatalogError> {
        let resources = self.catalog.list_resources()?;
        Ok(resolve_owner(&resources, artifact_id).cloned())
    }
}

/// Scans `resources` for the owner of `artifact_id`; the last match wins.
#[must_use]
pub fn resolve_owner<'r>(
    resources: &'r [Resource],
    artifact_id: &ArtifactId,
) -> Option<&'r Locator> {
    let mut owner = None;
    for resource in resources {
        for representation in &resource.representations {
            let Ok(candidate) = ArtifactId::from_locator(&representation.id) else {
                continue;
            };
            if candidate == *artifact_id {
                owner = Some(&resource.id);
            }
        }
    }
    owner
}
