//! Usage policy evaluation tests for provision-gate-config.
// crates/provision-gate-config/tests/usage_policy.rs
// =============================================================================
// Module: Usage Policy Tests
// Description: Validate pattern parsing, decisions, and descriptions.
// Purpose: Ensure usage control permits only what each pattern allows.
// =============================================================================

use provision_gate_config::UsageControlEngine;
use provision_gate_config::UsageControlEvaluator;
use provision_gate_config::UsagePattern;
use provision_gate_core::ArtifactId;
use provision_gate_core::ConnectorId;
use provision_gate_core::Locator;
use provision_gate_core::PolicyError;
use provision_gate_core::ProvisionEvent;
use provision_gate_core::ResourceId;
use provision_gate_core::Timestamp;
use provision_gate_core::UsagePolicy;
use provision_gate_core::UsagePolicyEvaluator;
use serde_json::Value;
use serde_json::json;

type TestResult = Result<(), String>;

/// Requester used by most events.
const REQUESTER: &str = "https://consumer.example/connectors/7";
/// Artifact named in every event.
const ARTIFACT: &str = "123e4567-e89b-12d3-a456-426614174000";
/// Resource named in every event.
const RESOURCE: &str = "11111111-1111-4111-8111-111111111111";
/// 2026-06-01T00:00:00Z in unix milliseconds.
const JUNE_FIRST_MS: i64 = 1_780_272_000_000;

/// Builds a provision event for `requester` at `at`.
fn event(requester: &str, at: Timestamp) -> Result<ProvisionEvent, String> {
    let artifact = Locator::new(format!("https://provider.example/api/artifacts/{ARTIFACT}"));
    let resource = Locator::new(format!("https://provider.example/api/resources/{RESOURCE}"));
    Ok(ProvisionEvent {
        requester: ConnectorId::new(requester),
        artifact_id: ArtifactId::from_locator(&artifact).map_err(|err| err.to_string())?,
        resource_id: ResourceId::from_locator(&resource).map_err(|err| err.to_string())?,
        at,
    })
}

/// Evaluates `document` with the pattern engine at June first.
fn decide(document: Value) -> Result<bool, PolicyError> {
    let evaluator = UsageControlEvaluator::new(UsageControlEngine::Pattern);
    let event = event(REQUESTER, Timestamp::UnixMillis(JUNE_FIRST_MS))
        .map_err(PolicyError::Evaluation)?;
    evaluator.permits(&UsagePolicy::new(document), &event)
}

/// Asserts that `document` decides to `expected`.
fn expect_decision(document: Value, expected: bool) -> TestResult {
    match decide(document.clone()) {
        Ok(decision) if decision == expected => Ok(()),
        Ok(decision) => Err(format!("{document} decided {decision}, expected {expected}")),
        Err(err) => Err(format!("{document} failed: {err}")),
    }
}

/// Asserts that `document` is rejected as malformed.
fn expect_malformed(document: Value) -> TestResult {
    match decide(document.clone()) {
        Err(PolicyError::Malformed(_)) => Ok(()),
        Err(err) => Err(format!("{document} failed with unexpected error: {err}")),
        Ok(decision) => Err(format!("{document} should be malformed, decided {decision}")),
    }
}

// ============================================================================
// SECTION: Access Patterns
// ============================================================================

#[test]
fn provide_access_permits() -> TestResult {
    expect_decision(json!({"pattern": "provide_access"}), true)
}

#[test]
fn prohibit_access_denies() -> TestResult {
    expect_decision(json!({"pattern": "prohibit_access"}), false)
}

#[test]
fn consumer_enforced_patterns_permit_at_provision() -> TestResult {
    for pattern in [
        "n_times_usage",
        "duration_usage",
        "usage_until_deletion",
        "usage_logging",
        "usage_notification",
    ] {
        expect_decision(json!({"pattern": pattern, "max": 3, "endpoint": "https://x"}), true)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Interval Pattern
// ============================================================================

#[test]
fn interval_permits_inside_window() -> TestResult {
    expect_decision(
        json!({
            "pattern": "usage_during_interval",
            "start": "2026-01-01T00:00:00Z",
            "end": "2026-12-31T23:59:59Z",
        }),
        true,
    )
}

#[test]
fn interval_denies_outside_window() -> TestResult {
    expect_decision(
        json!({
            "pattern": "usage_during_interval",
            "start": "2025-01-01T00:00:00Z",
            "end": "2025-12-31T23:59:59Z",
        }),
        false,
    )
}

#[test]
fn interval_bounds_are_inclusive() -> TestResult {
    expect_decision(
        json!({
            "pattern": "usage_during_interval",
            "start": "2026-06-01T00:00:00Z",
            "end": "2026-06-01T00:00:00Z",
        }),
        true,
    )
}

#[test]
fn interval_honors_offsets() -> TestResult {
    // 2026-06-01T02:00:00+02:00 is the same instant as June first UTC.
    expect_decision(
        json!({
            "pattern": "usage_during_interval",
            "start": "2026-06-01T02:00:00+02:00",
            "end": "2026-06-02T00:00:00Z",
        }),
        true,
    )
}

#[test]
fn interval_requires_unix_time() -> TestResult {
    let evaluator = UsageControlEvaluator::new(UsageControlEngine::Pattern);
    let policy = UsagePolicy::new(json!({
        "pattern": "usage_during_interval",
        "start": "2026-01-01T00:00:00Z",
        "end": "2026-12-31T23:59:59Z",
    }));
    let event = event(REQUESTER, Timestamp::Logical(7))?;
    match evaluator.permits(&policy, &event) {
        Err(PolicyError::Evaluation(message)) if message.contains("unix timestamp") => Ok(()),
        other => Err(format!("expected evaluation error, got {}", render(other))),
    }
}

#[test]
fn interval_start_keeps_sub_millisecond_precision() -> TestResult {
    // The request is issued at June first 00:00:00.000, before the start.
    expect_decision(
        json!({
            "pattern": "usage_during_interval",
            "start": "2026-06-01T00:00:00.9999Z",
            "end": "2026-06-02T00:00:00Z",
        }),
        false,
    )
}

#[test]
fn interval_missing_bound_is_malformed() -> TestResult {
    expect_malformed(json!({"pattern": "usage_during_interval", "start": "2026-01-01T00:00:00Z"}))
}

// ============================================================================
// SECTION: Connector Pattern
// ============================================================================

#[test]
fn connector_restriction_permits_listed_requester() -> TestResult {
    expect_decision(
        json!({
            "pattern": "connector_restricted_usage",
            "allowed_connectors": ["https://other.example/connectors/1", REQUESTER],
        }),
        true,
    )
}

#[test]
fn connector_restriction_denies_unlisted_requester() -> TestResult {
    expect_decision(
        json!({
            "pattern": "connector_restricted_usage",
            "allowed_connectors": ["https://other.example/connectors/1"],
        }),
        false,
    )
}

#[test]
fn empty_connector_restriction_is_malformed() -> TestResult {
    expect_malformed(json!({"pattern": "connector_restricted_usage", "allowed_connectors": []}))
}

// ============================================================================
// SECTION: Malformed Documents
// ============================================================================

#[test]
fn unknown_pattern_is_malformed() -> TestResult {
    expect_malformed(json!({"pattern": "share_with_friends"}))
}

#[test]
fn document_without_pattern_is_malformed() -> TestResult {
    expect_malformed(json!({"description": "anything goes"}))
}

#[test]
fn non_object_document_is_malformed() -> TestResult {
    expect_malformed(json!("provide_access"))
}

// ============================================================================
// SECTION: Engines
// ============================================================================

#[test]
fn permit_all_ignores_document() -> TestResult {
    let evaluator = UsageControlEvaluator::new(UsageControlEngine::PermitAll);
    let event = event(REQUESTER, Timestamp::Logical(1))?;
    let policy = UsagePolicy::new(json!({"pattern": "share_with_friends"}));
    match evaluator.permits(&policy, &event) {
        Ok(true) => Ok(()),
        other => Err(format!("expected permit, got {}", render(other))),
    }
}

#[test]
fn deny_all_ignores_document() -> TestResult {
    let evaluator = UsageControlEvaluator::new(UsageControlEngine::DenyAll);
    let event = event(REQUESTER, Timestamp::Logical(1))?;
    let policy = UsagePolicy::new(json!({"pattern": "provide_access"}));
    match evaluator.permits(&policy, &event) {
        Ok(false) => Ok(()),
        other => Err(format!("expected deny, got {}", render(other))),
    }
}

// ============================================================================
// SECTION: Descriptions
// ============================================================================

#[test]
fn describe_prefers_document_description() -> TestResult {
    let evaluator = UsageControlEvaluator::default();
    let policy =
        UsagePolicy::new(json!({"pattern": "prohibit_access", "description": "embargoed"}));
    let description = evaluator.describe(&policy);
    if description != "embargoed" {
        return Err(format!("unexpected description {description}"));
    }
    Ok(())
}

#[test]
fn describe_renders_pattern_name() -> TestResult {
    let evaluator = UsageControlEvaluator::default();
    let description = evaluator.describe(&UsagePolicy::new(json!({"pattern": "prohibit_access"})));
    if description != "prohibit access" {
        return Err(format!("unexpected description {description}"));
    }
    Ok(())
}

#[test]
fn describe_tolerates_malformed_documents() -> TestResult {
    let evaluator = UsageControlEvaluator::default();
    let description = evaluator.describe(&UsagePolicy::new(json!(42)));
    if description != "unrecognized usage policy" {
        return Err(format!("unexpected description {description}"));
    }
    Ok(())
}

#[test]
fn deny_all_describes_engine() -> TestResult {
    let evaluator = UsageControlEvaluator::new(UsageControlEngine::DenyAll);
    let description = evaluator.describe(&UsagePolicy::new(json!({"pattern": "provide_access"})));
    if description != "usage control denies all provision" {
        return Err(format!("unexpected description {description}"));
    }
    Ok(())
}

#[test]
fn parsed_pattern_names_round_trip() -> TestResult {
    let policy = UsagePolicy::new(json!({"pattern": "usage_until_deletion", "delay": "P1D"}));
    let pattern = UsagePattern::parse(&policy).map_err(|err| err.to_string())?;
    if pattern != UsagePattern::UsageUntilDeletion || pattern.name() != "usage_until_deletion" {
        return Err(format!("unexpected pattern {}", pattern.name()));
    }
    Ok(())
}

/// Renders a decision result for failure messages.
fn render(result: Result<bool, PolicyError>) -> String {
    match result {
        Ok(decision) => decision.to_string(),
        Err(err) => err.to_string(),
    }
}
