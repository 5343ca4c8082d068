//! API client for the admin server.
//!
//! Every request reads the credential from the session holder at build time,
//! so the client never holds a stale copy of the key.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::events::UnauthorizedSignal;
use crate::models::{AccountSummary, AccountsResponse};
use crate::storage::{SlotStore, ADMIN_API_KEY_SLOT};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// The admin server is usually local, so fail fast.
const REQUEST_TIMEOUT_SECS: u64 = 15;

const ACCOUNTS_PATH: &str = "/api/accounts";

/// API client for the admin server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SlotStore>,
    unauthorized: UnauthorizedSignal,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        session: Arc<dyn SlotStore>,
        unauthorized: UnauthorizedSignal,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            unauthorized,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the session credential, if there is one.
    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let key = self
            .session
            .get_non_empty(ADMIN_API_KEY_SLOT)
            .map_err(ApiError::Storage)?;
        Ok(match key {
            Some(key) => request.bearer_auth(key),
            None => {
                debug!("No admin credential in session, sending unauthenticated request");
                request
            }
        })
    }

    /// Map a non-success status to an error, raising the `unauthorized`
    /// signal for 401.
    pub fn check_status(&self, status: StatusCode, body: &str) -> Result<(), ApiError> {
        if status.is_success() {
            return Ok(());
        }
        let err = ApiError::from_status(status, body);
        if err.is_unauthorized() {
            warn!("Admin server rejected the credential");
            self.unauthorized.raise();
        }
        Err(err)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let request = self.authorize(self.client.get(&url))?;
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        self.check_status(status, &body)?;

        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)))
    }

    /// Fetch the managed accounts
    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, ApiError> {
        let resp: AccountsResponse = self.get(ACCOUNTS_PATH).await?;
        Ok(resp.into_accounts())
    }
}
