// crates/provision-gate-core/src/runtime/catalog.rs
// ============================================================================
// Module: Provision Gate In-Memory Catalog
// Description: Simple in-memory resource catalog for tests and local hosts.
// Purpose: Provide a deterministic catalog implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryCatalog`] keeps resources in insertion order, which is also the
//! listing order the resolver traverses. Reads take a shared lock, so any
//! number of gate threads may read concurrently.
//!
//! The catalog does not reject two resources offering the same
//! representation; callers that need uniqueness validate before inserting.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::core::ArtifactId;
use crate::core::Resource;
use crate::core::ResourceId;
use crate::core::ResourceMetadata;
use crate::interfaces::CatalogError;
use crate::interfaces::ResourceCatalog;

// ============================================================================
// SECTION: In-Memory Catalog
// ============================================================================

/// One catalog record.
#[derive(Debug, Clone)]
struct CatalogEntry {
    /// Identifier extracted from the resource locator.
    resource_id: ResourceId,
    /// Resource record.
    resource: Resource,
    /// Resource metadata.
    metadata: ResourceMetadata,
    /// Artifact data keyed by artifact identifier.
    data: BTreeMap<ArtifactId, Vec<u8>>,
}

/// In-memory resource catalog.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    /// Catalog entries in insertion order.
    entries: Arc<RwLock<Vec<CatalogEntry>>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a resource with its metadata and artifact data.
    ///
    /// A resource whose identifier is already present is replaced in place,
    /// keeping its listing position.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the resource locator holds no UUID or the
    /// catalog lock is poisoned.
    pub fn insert(
        &self,
        resource: Resource,
        metadata: ResourceMetadata,
        data: impl IntoIterator<Item = (ArtifactId, Vec<u8>)>,
    ) -> Result<ResourceId, CatalogError> {
        let resource_id = ResourceId::from_locator(&resource.id)
            .map_err(|err| CatalogError::Data(err.to_string()))?;
        let entry = CatalogEntry {
            resource_id,
            resource,
            metadata,
            data: data.into_iter().collect(),
        };
        let mut guard = self
            .entries
            .write()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))?;
        if let Some(existing) = guard.iter_mut().find(|item| item.resource_id == resource_id) {
            *existing = entry;
        } else {
            guard.push(entry);
        }
        drop(guard);
        Ok(resource_id)
    }

    /// Returns the number of resources in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog lock is poisoned.
    pub fn len(&self) -> Result<usize, CatalogError> {
        let guard = self.read()?;
        Ok(guard.len())
    }

    /// Returns true when the catalog holds no resources.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }

    /// Acquires the shared read lock.
    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<CatalogEntry>>, CatalogError> {
        self.entries
            .read()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn list_resources(&self) -> Result<Vec<Resource>, CatalogError> {
        let guard = self.read()?;
        Ok(guard.iter().map(|entry| entry.resource.clone()).collect())
    }

    fn metadata(&self, resource_id: &ResourceId) -> Result<ResourceMetadata, CatalogError> {
        let guard = self.read()?;
        guard
            .iter()
            .find(|entry| entry.resource_id == *resource_id)
            .map(|entry| entry.metadata.clone())
            .ok_or_else(|| CatalogError::NotFound(format!("resource {resource_id}")))
    }

    fn data(
        &self,
        resource_id: &ResourceId,
        artifact_id: &ArtifactId,
    ) -> Result<Vec<u8>, CatalogError> {
        let guard = self.read()?;
        let entry = guard
            .iter()
            .find(|entry| entry.resource_id == *resource_id)
            .ok_or_else(|| CatalogError::NotFound(format!("resource {resource_id}")))?;
        entry.data.get(artifact_id).cloned().ok_or_else(|| {
            let detail = format!("no data for artifact {artifact_id} in resource {resource_id}");
            CatalogError::Data(detail)
        })
    }
}
