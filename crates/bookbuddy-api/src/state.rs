use std::time::Duration;

use reqwest::{redirect, Client};

use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    pub gateway_url: String,
    pub http: Client,
}

impl AppState {
    pub fn new(gateway: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(gateway.timeout_secs))
            .danger_accept_invalid_certs(gateway.accept_invalid_certs)
            // Gateway redirects belong to the browser.
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            gateway_url: gateway.url.trim_end_matches('/').to_string(),
            http,
        })
    }
}
