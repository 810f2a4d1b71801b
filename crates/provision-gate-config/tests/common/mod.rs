// crates/provision-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for provision-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use provision_gate_config::ConfigError;
use provision_gate_config::ProvisionGateConfig;

/// Connector section shared by every fixture.
pub const CONNECTOR_TOML: &str = r#"
[connector]
id = "https://provider.example/connectors/1"
security_token = "token-abc"
"#;

/// Two resources with distinct representations and different policies.
pub const CATALOG_TOML: &str = r#"
[audit]
sink = "none"

[[resources]]
id = "https://provider.example/api/resources/11111111-1111-4111-8111-111111111111"
title = "weather readings"
keywords = ["weather"]
policy = { pattern = "provide_access" }

[[resources.representations]]
id = "https://provider.example/api/representations/123e4567-e89b-12d3-a456-426614174000"
media_type = "text/csv"
data = "station,temp\nA,12"

[[resources]]
id = "https://provider.example/api/resources/22222222-2222-4222-8222-222222222222"
title = "traffic counts"
policy = { pattern = "prohibit_access", description = "traffic data is embargoed" }

[[resources.representations]]
id = "https://provider.example/api/representations/bbbbbbbb-bbbb-4bbb-8bbb-bbbbbbbbbbbb"
data = "road,count"
"#;

/// Parses a TOML string into a `ProvisionGateConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<ProvisionGateConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a config holding only the connector section.
pub fn minimal_config() -> Result<ProvisionGateConfig, toml::de::Error> {
    config_from_toml(CONNECTOR_TOML)
}

/// Returns the connector section followed by `rest`.
pub fn config_with(rest: &str) -> Result<ProvisionGateConfig, String> {
    config_from_toml(&format!("{CONNECTOR_TOML}\n{rest}")).map_err(|err| err.to_string())
}

/// Asserts that validation failed with a message containing `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
