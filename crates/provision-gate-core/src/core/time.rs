// crates/provision-gate-core/src/core/time.rs
// ============================================================================
// Module: Provision Gate Time Model
// Description: Timestamp values stamped on response headers and provision events.
// Purpose: Keep gate decisions replayable by passing time in explicitly.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The gate never reads wall-clock time itself. Response headers receive an
//! issue time from the envelope builder's clock, and policy evaluation sees
//! that same value through the provision event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Timestamp carried on response headers and provision events.
///
/// # Invariants
/// - Values are supplied by a clock outside the gate.
/// - Logical values have no wall-clock meaning; time-bound policies reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }
}
