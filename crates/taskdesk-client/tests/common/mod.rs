/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskdesk-client tests

use taskdesk_client::{ClientConfig, SessionToken, TaskdeskClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server root
pub fn client_for(server: &MockServer) -> TaskdeskClient {
    TaskdeskClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Mock session token for testing
pub fn mock_session_token() -> SessionToken {
    SessionToken::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.signature")
}
