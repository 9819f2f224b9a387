//! HTTP implementation of [`PosClient`] for the EdgeServ POS backend.
//!
//! Two endpoints only: the password-grant token endpoint and the
//! back-of-house customer list. Both are scoped under the tenant's
//! restaurant code.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::PosConfig;
use crate::contract::{Customer, PosClient, PosError};

/// Expected JSON response from the OAuth token endpoint.
#[derive(Deserialize)]
struct OAuthResponse {
    value: String,
}

pub struct EdgeservClient {
    http: Client,
    config: PosConfig,
}

impl EdgeservClient {
    pub fn new(config: PosConfig) -> Self {
        EdgeservClient {
            http: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.host.trim_end_matches('/'), // avoid "//"
            self.config.restaurant_code,
            path
        )
    }
}

#[async_trait]
impl PosClient for EdgeservClient {
    async fn authenticate(&self) -> Result<String, PosError> {
        let url = self.endpoint("oauth/token");
        info!(url = %url, "Fetching POS OAuth token");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("grant_type", "password"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(status = %status, url = %url, "POS token endpoint returned error: {body}");
            return Err(format!("POS token endpoint returned {status}: {body}").into());
        }

        let token: OAuthResponse = response.json().await?;
        Ok(token.value)
    }

    async fn list_customers(&self, token: &str) -> Result<Vec<Customer>, PosError> {
        let url = self.endpoint("backofhouse/customer/list");
        info!(url = %url, "Fetching POS customer roster");

        let body = serde_json::json!({
            "serverId": null,
            "searchValue": "",
            "addressRequired": false,
            "zipRequired": false,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to decode response body>"));
            error!(status = %status, url = %url, "POS customer list returned error: {body}");
            return Err(format!("POS customer list returned {status}: {body}").into());
        }

        let customers: Vec<Customer> = response.json().await?;
        info!(count = customers.len(), "POS customer roster fetched");
        Ok(customers)
    }
}
