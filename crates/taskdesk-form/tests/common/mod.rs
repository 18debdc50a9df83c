/*
[INPUT]:  Mock server requirements for form flows
[OUTPUT]: Shared fixtures for form integration tests
[POS]:    Test infrastructure - shared across form test modules
[UPDATE]: When adding new test patterns or fixtures
*/

use std::sync::Arc;

use taskdesk_client::{ClientConfig, SessionToken, TaskStore, TaskdeskClient};
use wiremock::MockServer;

#[allow(dead_code)]
pub const TOKEN: &str = "session-token-123";

pub fn token() -> SessionToken {
    SessionToken::new(TOKEN)
}

/// Real HTTP client pointed at the mock server, behind the store trait
pub fn store_for(server: &MockServer) -> Arc<dyn TaskStore> {
    Arc::new(
        TaskdeskClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init"),
    )
}
