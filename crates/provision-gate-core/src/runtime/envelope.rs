// crates/provision-gate-core/src/runtime/envelope.rs
// ============================================================================
// Module: Connector Envelope Builder
// Description: Response header construction from connector identity.
// Purpose: Provide the default header builder, token providers, and clocks.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`ConnectorEnvelopeBuilder`] fills a [`ResponseHeader`] from the local
//! connector identity, an opaque token, and a clock reading. The correlation
//! identifier is the request's message identifier and the only recipient is
//! the connector that issued the request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use crate::core::ArtifactRequest;
use crate::core::ConnectorId;
use crate::core::ResponseHeader;
use crate::core::Timestamp;
use crate::interfaces::Clock;
use crate::interfaces::EnvelopeBuilder;
use crate::interfaces::TokenProvider;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Identity of the local connector stamped on every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorIdentity {
    /// Connector identifier, used as issuer and sender agent.
    pub id: ConnectorId,
    /// Outbound information model version.
    pub model_version: String,
}

// ============================================================================
// SECTION: Token Providers
// ============================================================================

/// Token provider returning a fixed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticTokenProvider {
    /// Token attached to headers, if any.
    token: Option<String>,
}

impl StaticTokenProvider {
    /// Creates a provider that always returns `token`.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Clock reading the system wall clock in unix milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Timestamp::UnixMillis(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}

/// Clock that always returns the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Default response header builder.
#[derive(Debug, Clone)]
pub struct ConnectorEnvelopeBuilder<T, K> {
    /// Local connector identity.
    identity: ConnectorIdentity,
    /// Source of the opaque security token.
    tokens: T,
    /// Source of issue timestamps.
    clock: K,
}

impl<T: TokenProvider, K: Clock> ConnectorEnvelopeBuilder<T, K> {
    /// Creates a builder for the given identity.
    #[must_use]
    pub const fn new(identity: ConnectorIdentity, tokens: T, clock: K) -> Self {
        Self {
            identity,
            tokens,
            clock,
        }
    }

    /// Returns the connector identity.
    #[must_use]
    pub const fn identity(&self) -> &ConnectorIdentity {
        &self.identity
    }
}

impl<T: TokenProvider, K: Clock> EnvelopeBuilder for ConnectorEnvelopeBuilder<T, K> {
    fn build(&self, request: &ArtifactRequest) -> ResponseHeader {
        ResponseHeader {
            correlation_message: request.message_id.clone(),
            issued: self.clock.now(),
            issuer_connector: self.identity.id.clone(),
            sender_agent: self.identity.id.clone(),
            recipient_connectors: vec![request.issuer_connector.clone()],
            model_version: self.identity.model_version.clone(),
            security_token: self.tokens.token(),
        }
    }
}
