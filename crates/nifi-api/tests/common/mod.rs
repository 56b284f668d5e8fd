// Shared wiremock setup for the integration tests.

#![allow(dead_code)]

use nifi_api::{Client, ClientConfig};
use wiremock::MockServer;

pub const API_PATH: &str = "nifi-api";

pub async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(server.address().to_string(), API_PATH);
    let client = Client::new(config, reqwest::Client::new());
    (server, client)
}

pub fn api_path(suffix: &str) -> String {
    format!("/{API_PATH}/{suffix}")
}
