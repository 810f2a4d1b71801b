// crates/provision-gate-config/src/config.rs
// ============================================================================
// Module: Provision Gate Configuration
// Description: Configuration loading, validation, and gate assembly.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: provision-gate-core, serde, serde_json, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits
//! and validated before anything is built from it. The seeded catalog is
//! checked for duplicate representations here, since the resolver assumes each
//! artifact has one owner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use provision_gate_core::ArtifactId;
use provision_gate_core::ConnectorEnvelopeBuilder;
use provision_gate_core::ConnectorId;
use provision_gate_core::ConnectorIdentity;
use provision_gate_core::InMemoryCatalog;
use provision_gate_core::Locator;
use provision_gate_core::ProvisionAuditSink;
use provision_gate_core::ProvisionGate;
use provision_gate_core::Representation;
use provision_gate_core::Resource;
use provision_gate_core::ResourceId;
use provision_gate_core::ResourceMetadata;
use provision_gate_core::StaticTokenProvider;
use provision_gate_core::SystemClock;
use provision_gate_core::UsagePolicy;
use provision_gate_core::runtime::FileAuditSink;
use provision_gate_core::runtime::NoopAuditSink;
use provision_gate_core::runtime::StderrAuditSink;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::policy::UsageControlEngine;
use crate::policy::UsageControlEvaluator;
use crate::policy::UsagePattern;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "provision-gate.toml";
/// Environment variable used to override the config path.
const CONFIG_ENV_VAR: &str = "PROVISION_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a connector, resource, or representation locator.
pub const MAX_LOCATOR_LENGTH: usize = 2048;
/// Maximum number of seeded resources.
pub const MAX_RESOURCES: usize = 1024;
/// Maximum number of representations per resource.
pub const MAX_REPRESENTATIONS_PER_RESOURCE: usize = 64;
/// Maximum length of the connector security token.
pub const MAX_SECURITY_TOKEN_LENGTH: usize = 8192;
/// Model version stamped on responses when none is configured.
const DEFAULT_MODEL_VERSION: &str = "4.0.0";

// ============================================================================
// SECTION: Gate Types
// ============================================================================

/// Envelope builder assembled from configuration.
pub type ConfiguredEnvelope = ConnectorEnvelopeBuilder<StaticTokenProvider, SystemClock>;

/// Provision gate assembled from configuration.
pub type ConfiguredGate = ProvisionGate<InMemoryCatalog, UsageControlEvaluator, ConfiguredEnvelope>;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Provision gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionGateConfig {
    /// Local connector identity.
    pub connector: ConnectorConfig,
    /// Usage control engine selection.
    #[serde(default)]
    pub usage_control: UsageControlConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Resources seeded into the in-memory catalog.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl ProvisionGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connector.validate()?;
        self.audit.validate()?;
        if self.resources.len() > MAX_RESOURCES {
            return Err(ConfigError::Invalid(format!(
                "resources exceeds max of {MAX_RESOURCES} entries"
            )));
        }
        let mut resource_ids = BTreeSet::new();
        let mut artifact_ids = BTreeSet::new();
        for (idx, resource) in self.resources.iter().enumerate() {
            let field = format!("resources[{idx}]");
            let resource_id = resource.validate(&field, self.usage_control.engine)?;
            if !resource_ids.insert(resource_id) {
                return Err(ConfigError::Invalid(format!(
                    "{field}.id duplicates resource {resource_id}"
                )));
            }
            for (rep_idx, representation) in resource.representations.iter().enumerate() {
                let artifact_id = artifact_id_of(
                    &format!("{field}.representations[{rep_idx}].id"),
                    &representation.id,
                )?;
                if !artifact_ids.insert(artifact_id) {
                    return Err(ConfigError::Invalid(format!(
                        "{field}.representations[{rep_idx}].id duplicates artifact {artifact_id} \
                         offered by another representation"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the in-memory catalog seeded with the configured resources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a resource cannot be inserted.
    pub fn build_catalog(&self) -> Result<InMemoryCatalog, ConfigError> {
        let catalog = InMemoryCatalog::new();
        for (idx, resource) in self.resources.iter().enumerate() {
            let field = format!("resources[{idx}]");
            let mut data = Vec::with_capacity(resource.representations.len());
            for (rep_idx, representation) in resource.representations.iter().enumerate() {
                let artifact_id = artifact_id_of(
                    &format!("{field}.representations[{rep_idx}].id"),
                    &representation.id,
                )?;
                data.push((artifact_id, representation.data.clone().into_bytes()));
            }
            catalog
                .insert(resource.to_resource(), resource.to_metadata(), data)
                .map_err(|err| ConfigError::Invalid(format!("{field}: {err}")))?;
        }
        Ok(catalog)
    }

    /// Builds the usage policy evaluator for the configured engine.
    #[must_use]
    pub const fn build_evaluator(&self) -> UsageControlEvaluator {
        UsageControlEvaluator::new(self.usage_control.engine)
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit file cannot be opened.
    pub fn build_audit_sink(&self) -> Result<Arc<dyn ProvisionAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for file sink".to_string())
                })?;
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }

    /// Builds the envelope builder for the local connector.
    #[must_use]
    pub fn build_envelope_builder(&self) -> ConfiguredEnvelope {
        ConnectorEnvelopeBuilder::new(
            self.connector.identity(),
            StaticTokenProvider::new(self.connector.security_token.clone()),
            SystemClock,
        )
    }

    /// Assembles a provision gate from every configured collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the catalog or audit sink cannot be built.
    pub fn build_gate(&self) -> Result<ConfiguredGate, ConfigError> {
        let gate = ProvisionGate::new(
            self.build_catalog()?,
            self.build_evaluator(),
            self.build_envelope_builder(),
        );
        Ok(gate.with_audit_sink(self.build_audit_sink()?))
    }
}

// ============================================================================
// SECTION: Connector Config
// ============================================================================

/// Local connector identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorConfig {
    /// Connector locator used as issuer and sender agent.
    pub id: String,
    /// Outbound information model version.
    #[serde(default = "default_model_version")]
    pub model_version: String,
    /// Opaque security token attached to every response.
    #[serde(default)]
    pub security_token: Option<String>,
}

impl ConnectorConfig {
    /// Validates connector configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_locator_string("connector.id", &self.id)?;
        if self.model_version.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "connector.model_version must be non-empty".to_string(),
            ));
        }
        if let Some(token) = &self.security_token {
            if token.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "connector.security_token must be non-empty when set".to_string(),
                ));
            }
            if token.len() > MAX_SECURITY_TOKEN_LENGTH {
                return Err(ConfigError::Invalid(
                    "connector.security_token exceeds max length".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Returns the connector identity stamped on responses.
    #[must_use]
    pub fn identity(&self) -> ConnectorIdentity {
        ConnectorIdentity {
            id: ConnectorId::new(self.id.trim()),
            model_version: self.model_version.clone(),
        }
    }
}

/// Default outbound model version.
fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

// ============================================================================
// SECTION: Usage Control Config
// ============================================================================

/// Usage control configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UsageControlConfig {
    /// Engine used to evaluate resource policies.
    #[serde(default)]
    pub engine: UsageControlEngine,
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Sink receiving provision audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines), required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        if self.sink == AuditSinkKind::File && self.path.is_none() {
            return Err(ConfigError::Invalid("audit.path is required for file sink".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Resource Config
// ============================================================================

/// Seeded catalog resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    /// Resource locator embedding the resource UUID.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Owning party locator.
    #[serde(default)]
    pub owner: Option<String>,
    /// Usage policy document as an inline table.
    ///
    /// TOML datetimes become RFC 3339 strings in the document.
    #[serde(deserialize_with = "deserialize_policy")]
    pub policy: Value,
    /// Representations offered by the resource.
    #[serde(default)]
    pub representations: Vec<RepresentationConfig>,
}

impl ResourceConfig {
    /// Validates the resource and returns its identifier.
    fn validate(&self, field: &str, engine: UsageControlEngine) -> Result<ResourceId, ConfigError> {
        let id_field = format!("{field}.id");
        validate_locator_string(&id_field, &self.id)?;
        let resource_id = ResourceId::from_locator(&Locator::new(self.id.trim()))
            .map_err(|err| ConfigError::Invalid(format!("{id_field}: {err}")))?;
        if self.title.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{field}.title must be non-empty")));
        }
        if let Some(owner) = &self.owner {
            validate_locator_string(&format!("{field}.owner"), owner)?;
        }
        if !self.policy.is_object() {
            return Err(ConfigError::Invalid(format!("{field}.policy must be a table")));
        }
        if engine == UsageControlEngine::Pattern {
            UsagePattern::parse(&UsagePolicy::new(self.policy.clone()))
                .map_err(|err| ConfigError::Invalid(format!("{field}.policy: {err}")))?;
        }
        if self.representations.len() > MAX_REPRESENTATIONS_PER_RESOURCE {
            return Err(ConfigError::Invalid(format!(
                "{field}.representations exceeds max of {MAX_REPRESENTATIONS_PER_RESOURCE} entries"
            )));
        }
        Ok(resource_id)
    }

    /// Converts the entry into a catalog resource.
    fn to_resource(&self) -> Resource {
        Resource::new(
            Locator::new(self.id.trim()),
            self.representations.iter().map(RepresentationConfig::to_representation).collect(),
        )
    }

    /// Converts the entry into resource metadata.
    fn to_metadata(&self) -> ResourceMetadata {
        ResourceMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            keywords: self.keywords.clone(),
            owner: self.owner.as_deref().map(|owner| Locator::new(owner.trim())),
            policy: UsagePolicy::new(self.policy.clone()),
        }
    }
}

/// Seeded representation of a resource.
#[derive(Debug, Clone, Deserialize)]
pub struct RepresentationConfig {
    /// Representation locator embedding the artifact UUID.
    pub id: String,
    /// Media type of the rendition.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Language of the rendition.
    #[serde(default)]
    pub language: Option<String>,
    /// UTF-8 text served as the artifact data.
    #[serde(default)]
    pub data: String,
}

impl RepresentationConfig {
    /// Converts the entry into a catalog representation.
    fn to_representation(&self) -> Representation {
        Representation {
            id: Locator::new(self.id.trim()),
            media_type: self.media_type.clone(),
            language: self.language.clone(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or opening sinks.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.to_string_lossy().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a locator string against emptiness and length limits.
fn validate_locator_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_LOCATOR_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Reads a policy table, keeping TOML datetimes as RFC 3339 strings.
fn deserialize_policy<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    toml::Value::deserialize(deserializer).map(policy_value)
}

/// Converts a TOML value into a JSON policy value.
fn policy_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::from(number),
        toml::Value::Float(number) => Value::from(number),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(policy_value).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(key, item)| (key, policy_value(item))).collect())
        }
    }
}

/// Extracts the artifact identifier from a representation locator.
fn artifact_id_of(field: &str, value: &str) -> Result<ArtifactId, ConfigError> {
    validate_locator_string(field, value)?;
    ArtifactId::from_locator(&Locator::new(value.trim()))
        .map_err(|err| ConfigError::Invalid(format!("{field}: {err}")))
}
