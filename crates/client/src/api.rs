//! REST client for the analytics API.
//!
//! Wraps the dashboard's JSON endpoints using [`reqwest`]. Every request
//! except login and registration carries the bearer token from the injected
//! [`TokenProvider`]; a 401 clears that token and surfaces as
//! [`ClientError::Unauthorized`].

use std::sync::Arc;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use netenergy_core::energy::EnergySummary;
use netenergy_core::policy::{ActionCount, PolicyDecision, PolicyTimelinePoint};
use netenergy_core::simulation::SimulationResult;
use netenergy_core::status::CellStatus;
use netenergy_core::telemetry::{CellMetricSample, CellSnapshot};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::TokenProvider;

/// Page size the analytics API uses for `/api/policies` when none is given.
pub const DEFAULT_POLICY_PAGE_SIZE: u32 = 500;

/// Response from `POST /auth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body for `POST /auth/register`.
#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// HTTP client for the analytics API.
pub struct DashboardApi {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl DashboardApi {
    /// Build a client from configuration.
    ///
    /// Seeds the token store with `config.token` when one is configured.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        if let Some(token) = &config.token {
            tokens.store(token.clone());
        }
        Self::with_client(client, &config.base_url, tokens)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API base URL '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn tokens(&self) -> &Arc<dyn TokenProvider> {
        &self.tokens
    }

    // ---- auth ----

    /// Exchange credentials for a bearer token and store it.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<TokenResponse> {
        let response = self
            .client
            .post(self.endpoint(&["auth", "token"])?)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let token: TokenResponse = Self::ensure_success(response).await?.json().await?;
        self.tokens.store(token.access_token.clone());
        tracing::info!(user = %self.tokens.display_name(), "Logged in to analytics API");
        Ok(token)
    }

    /// Register a new account. Does not log in.
    pub async fn register(&self, username: &str, password: &str) -> ClientResult<serde_json::Value> {
        let response = self
            .client
            .post(self.endpoint(&["auth", "register"])?)
            .json(&RegisterBody { username, password })
            .send()
            .await?;

        Ok(Self::ensure_success(response).await?.json().await?)
    }

    /// Forget the stored token.
    pub fn logout(&self) {
        self.tokens.clear();
    }

    // ---- data endpoints ----

    pub async fn fetch_alerts(&self) -> ClientResult<Vec<CellMetricSample>> {
        self.get_json(&["api", "alerts"]).await
    }

    pub async fn fetch_simulation(&self, cell_id: &str) -> ClientResult<SimulationResult> {
        self.get_json(&["api", "simulate", cell_id]).await
    }

    pub async fn fetch_latest_policy_actions(&self) -> ClientResult<Vec<PolicyDecision>> {
        self.get_json(&["api", "policy_actions", "latest"]).await
    }

    /// Full policy history, newest first. Pages are 1-based; 0 reads as 1.
    pub async fn fetch_policies(
        &self,
        page: u32,
        page_size: u32,
    ) -> ClientResult<Vec<PolicyDecision>> {
        let mut url = self.endpoint(&["api", "policies"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string())
            .append_pair("page_size", &page_size.to_string());
        self.get_url(url).await
    }

    /// Per-action decision counts for the reporting window.
    pub async fn fetch_policy_summary(&self) -> ClientResult<Vec<ActionCount>> {
        self.get_json(&["api", "policy_summary"]).await
    }

    /// Action history for one cell, oldest first.
    pub async fn fetch_policy_timeline(
        &self,
        cell_id: &str,
    ) -> ClientResult<Vec<PolicyTimelinePoint>> {
        self.get_json(&["api", "policy_timeline", cell_id]).await
    }

    pub async fn fetch_cell_status(&self) -> ClientResult<Vec<CellStatus>> {
        self.get_json(&["api", "cell_status"]).await
    }

    pub async fn fetch_cells(&self) -> ClientResult<Vec<CellSnapshot>> {
        self.get_json(&["api", "cells"]).await
    }

    pub async fn fetch_energy_summary(&self) -> ClientResult<EnergySummary> {
        self.get_json(&["api", "cell_energy_summary"]).await
    }

    // ---- private helpers ----

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        self.get_url(self.endpoint(segments)?).await
    }

    /// Authenticated `GET` returning a parsed JSON body.
    async fn get_url<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        tracing::debug!(url = %url, "GET");

        let mut request = self.client.get(url);
        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Analytics API returned 401; clearing stored token");
            self.tokens.clear();
            return Err(ClientError::Unauthorized);
        }
        Ok(Self::ensure_success(response).await?.json::<T>().await?)
    }

    /// Return the response unchanged on success, or an
    /// [`ClientError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;

    fn api(base: &str) -> ClientResult<DashboardApi> {
        DashboardApi::with_client(
            reqwest::Client::new(),
            base,
            Arc::new(MemoryTokenStore::new()),
        )
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_segments() {
        let api = api("http://localhost:8000/analytics/").unwrap();
        let url = api.endpoint(&["api", "simulate", "cell 7/a"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/analytics/api/simulate/cell%207%2Fa"
        );
    }

    #[test]
    fn endpoint_on_bare_host() {
        let api = api("http://localhost:8000").unwrap();
        let url = api.endpoint(&["api", "alerts"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/alerts");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(api("not a url"), Err(ClientError::Config(_))));
        assert!(matches!(api("mailto:noc@example.net"), Err(ClientError::Config(_))));
    }

    #[test]
    fn configured_token_seeds_store() {
        let store = Arc::new(MemoryTokenStore::new());
        let config = ClientConfig {
            token: Some("seeded".into()),
            ..Default::default()
        };
        let api = DashboardApi::new(&config, store.clone()).unwrap();
        assert_eq!(api.tokens().token().as_deref(), Some("seeded"));
    }
}
