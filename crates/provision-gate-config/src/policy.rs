// crates/provision-gate-config/src/policy.rs
// ============================================================================
// Module: Usage Control Evaluators
// Description: Pattern-based usage policy evaluation for artifact provision.
// Purpose: Decide, fail closed, whether a resource policy permits provision.
// Dependencies: provision-gate-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Usage policies are JSON documents naming a pattern plus its parameters:
//!
//! ```json
//! { "pattern": "usage_during_interval",
//!   "start": "2026-01-01T00:00:00Z", "end": "2026-12-31T23:59:59Z" }
//! ```
//!
//! Only the access, interval, and connector patterns constrain provision
//! itself. Counting, duration, deletion, logging, and notification patterns
//! are obligations the consumer enforces after it receives the data, so they
//! permit at this point. Unknown or malformed documents are errors, never
//! permits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use provision_gate_core::PolicyError;
use provision_gate_core::ProvisionEvent;
use provision_gate_core::Timestamp;
use provision_gate_core::UsagePolicy;
use provision_gate_core::UsagePolicyEvaluator;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Engine Selection
// ============================================================================

/// Usage control engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UsageControlEngine {
    /// Evaluate each resource's policy document.
    #[default]
    Pattern,
    /// Permit every provision regardless of policy.
    PermitAll,
    /// Deny every provision regardless of policy.
    DenyAll,
}

// ============================================================================
// SECTION: Policy Patterns
// ============================================================================

/// Usage policy pattern parsed from a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum UsagePattern {
    /// Unrestricted access.
    ProvideAccess,
    /// No access.
    ProhibitAccess,
    /// Access only within an RFC 3339 time window, bounds inclusive.
    UsageDuringInterval {
        /// Window start.
        start: String,
        /// Window end.
        end: String,
    },
    /// Access only for the listed connectors.
    ConnectorRestrictedUsage {
        /// Connector identifiers allowed to receive data.
        allowed_connectors: Vec<String>,
    },
    /// Bounded number of uses, counted by the consumer.
    NTimesUsage,
    /// Bounded usage duration, tracked by the consumer.
    DurationUsage,
    /// Usage until the consumer deletes the data.
    UsageUntilDeletion,
    /// Usage that the consumer must log.
    UsageLogging,
    /// Usage that the consumer must report.
    UsageNotification,
}

impl UsagePattern {
    /// Parses the pattern from a policy document.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Malformed`] when the document names no known
    /// pattern or its parameters are invalid.
    pub fn parse(policy: &UsagePolicy) -> Result<Self, PolicyError> {
        let pattern = Self::deserialize(policy.document())
            .map_err(|err| PolicyError::Malformed(err.to_string()))?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Returns the snake-case pattern name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProvideAccess => "provide_access",
            Self::ProhibitAccess => "prohibit_access",
            Self::UsageDuringInterval {
                ..
            } => "usage_during_interval",
            Self::ConnectorRestrictedUsage {
                ..
            } => "connector_restricted_usage",
            Self::NTimesUsage => "n_times_usage",
            Self::DurationUsage => "duration_usage",
            Self::UsageUntilDeletion => "usage_until_deletion",
            Self::UsageLogging => "usage_logging",
            Self::UsageNotification => "usage_notification",
        }
    }

    /// Checks pattern parameters for internal consistency.
    fn validate(&self) -> Result<(), PolicyError> {
        match self {
            Self::UsageDuringInterval {
                start,
                end,
            } => {
                let (start, end) = (parse_instant(start)?, parse_instant(end)?);
                if start > end {
                    return Err(PolicyError::Malformed(
                        "usage interval start is after its end".to_string(),
                    ));
                }
                Ok(())
            }
            Self::ConnectorRestrictedUsage {
                allowed_connectors,
            } => {
                if allowed_connectors.is_empty() {
                    return Err(PolicyError::Malformed(
                        "connector restriction lists no connectors".to_string(),
                    ));
                }
                Ok(())
            }
            Self::ProvideAccess
            | Self::ProhibitAccess
            | Self::NTimesUsage
            | Self::DurationUsage
            | Self::UsageUntilDeletion
            | Self::UsageLogging
            | Self::UsageNotification => Ok(()),
        }
    }

    /// Decides whether the pattern permits the provision event.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the pattern cannot be decided for the event.
    pub fn permits(&self, event: &ProvisionEvent) -> Result<bool, PolicyError> {
        match self {
            Self::ProvideAccess
            | Self::NTimesUsage
            | Self::DurationUsage
            | Self::UsageUntilDeletion
            | Self::UsageLogging
            | Self::UsageNotification => Ok(true),
            Self::ProhibitAccess => Ok(false),
            Self::UsageDuringInterval {
                start,
                end,
            } => {
                let at = issued_instant(event.at)?;
                Ok(parse_instant(start)? <= at && at <= parse_instant(end)?)
            }
            Self::ConnectorRestrictedUsage {
                allowed_connectors,
            } => Ok(allowed_connectors
                .iter()
                .any(|connector| connector.as_str() == event.requester.as_str())),
        }
    }
}

/// Parses an RFC 3339 instant.
fn parse_instant(value: &str) -> Result<OffsetDateTime, PolicyError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|err| PolicyError::Malformed(format!("invalid instant `{value}`: {err}")))
}

/// Converts the event issue time to an instant.
fn issued_instant(at: Timestamp) -> Result<OffsetDateTime, PolicyError> {
    let millis = at.as_unix_millis().ok_or_else(|| {
        PolicyError::Evaluation("usage interval requires a unix timestamp".to_string())
    })?;
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|err| PolicyError::Evaluation(format!("issue time out of range: {err}")))
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Usage policy evaluator driven by the configured engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageControlEvaluator {
    /// Engine deciding how documents are treated.
    engine: UsageControlEngine,
}

impl UsageControlEvaluator {
    /// Creates an evaluator for the given engine.
    #[must_use]
    pub const fn new(engine: UsageControlEngine) -> Self {
        Self {
            engine,
        }
    }
}

impl UsagePolicyEvaluator for UsageControlEvaluator {
    fn permits(&self, policy: &UsagePolicy, event: &ProvisionEvent) -> Result<bool, PolicyError> {
        match self.engine {
            UsageControlEngine::PermitAll => Ok(true),
            UsageControlEngine::DenyAll => Ok(false),
            UsageControlEngine::Pattern => UsagePattern::parse(policy)?.permits(event),
        }
    }

    fn describe(&self, policy: &UsagePolicy) -> String {
        if self.engine == UsageControlEngine::DenyAll {
            return "usage control denies all provision".to_string();
        }
        if let Some(description) = policy.document().get("description").and_then(Value::as_str) {
            return description.to_string();
        }
        UsagePattern::parse(policy).map_or_else(
            |_| "unrecognized usage policy".to_string(),
            |pattern| pattern.name().replace('_', " "),
        )
    }
}
