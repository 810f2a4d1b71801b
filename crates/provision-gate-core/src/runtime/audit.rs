// crates/provision-gate-core/src/runtime/audit.rs
// ============================================================================
// Module: Provision Audit Logging
// Description: Structured audit events for artifact provision requests.
// Purpose: Emit one JSON-line event per request outcome without hard deps.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every request handled by the gate produces exactly one
//! [`ProvisionAuditEvent`]. Rejections are recorded at error level and name
//! the step that decided them, so "artifact unknown" and "catalog lookup
//! failed" stay distinguishable in logs even though requesters see a single
//! `not_found` rejection. Payload bytes are never logged, only their count.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ConnectorId;
use crate::core::CorrelationId;
use crate::core::Locator;
use crate::core::ProvisionOutcome;
use crate::runtime::gate::ProvisionStage;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    /// Normal completion.
    Info,
    /// Rejected request.
    Error,
}

/// Provision audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Severity of the event.
    pub level: AuditLevel,
    /// Request outcome.
    pub outcome: ProvisionOutcome,
    /// Step that decided the outcome.
    pub stage: ProvisionStage,
    /// Correlation identifier from the response header.
    pub correlation_id: CorrelationId,
    /// Requesting connector.
    pub requester: ConnectorId,
    /// Requested artifact locator.
    pub artifact: Locator,
    /// Resolved resource locator when resolution succeeded.
    pub resource: Option<Locator>,
    /// Log message; the rejection detail for failures.
    pub message: String,
    /// Released payload size in bytes.
    pub payload_bytes: usize,
}

/// Inputs required to construct a provision audit event.
pub struct ProvisionAuditEventParams {
    /// Request outcome.
    pub outcome: ProvisionOutcome,
    /// Step that decided the outcome.
    pub stage: ProvisionStage,
    /// Correlation identifier from the response header.
    pub correlation_id: CorrelationId,
    /// Requesting connector.
    pub requester: ConnectorId,
    /// Requested artifact locator.
    pub artifact: Locator,
    /// Resolved resource locator when resolution succeeded.
    pub resource: Option<Locator>,
    /// Log message.
    pub message: String,
    /// Released payload size in bytes.
    pub payload_bytes: usize,
}

impl ProvisionAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ProvisionAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let level =
            if params.outcome.is_rejection() { AuditLevel::Error } else { AuditLevel::Info };
        Self {
            event: "artifact_provision",
            timestamp_ms,
            level,
            outcome: params.outcome,
            stage: params.stage,
            correlation_id: params.correlation_id,
            requester: params.requester,
            artifact: params.artifact,
            resource: params.resource,
            message: params.message,
            payload_bytes: params.payload_bytes,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for provision events.
pub trait ProvisionAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ProvisionAuditEvent);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ProvisionAuditSink for StderrAuditSink {
    fn record(&self, event: &ProvisionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ProvisionAuditSink for FileAuditSink {
    fn record(&self, event: &ProvisionAuditEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ProvisionAuditSink for NoopAuditSink {
    fn record(&self, _event: &ProvisionAuditEvent) {}
}
