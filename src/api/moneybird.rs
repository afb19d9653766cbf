//! Blocking Moneybird API client

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use super::wire::{
    SynchronizationRequest, WireDocument, WireFinancialMutation, WireLedgerAccount,
};
use super::BookkeepingApi;
use crate::config::{SecretString, Settings};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{DateRange, Document, DocumentCollection, LedgerAccount, Transaction};

/// Moneybird API client for one administration
pub struct MoneybirdClient {
    client: Client,
    base_url: String,
    administration_id: String,
    token: SecretString,
}

impl MoneybirdClient {
    /// Create a client with an explicit base URL and timeout
    pub fn new(
        base_url: impl Into<String>,
        administration_id: impl Into<String>,
        token: SecretString,
        timeout: Duration,
    ) -> BudgetResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BudgetError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            administration_id: administration_id.into(),
            token,
        })
    }

    /// Create a client from resolved settings
    pub fn from_settings(settings: &Settings, token: SecretString) -> BudgetResult<Self> {
        let administration_id = settings.require_administration_id()?;
        Self::new(
            settings.api_base_url.clone(),
            administration_id,
            token,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Full URL of an administration-scoped endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.administration_id, endpoint)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.token.expose())
            .header(CONTENT_TYPE, "application/json")
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> BudgetResult<T> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%url, "GET");

        let response = self
            .authorized(self.client.get(&url))
            .query(query)
            .send()
            .map_err(|e| BudgetError::Http(format!("Request to {} failed: {}", endpoint, e)))?;

        read_json(response, endpoint)
    }

    fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> BudgetResult<T> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%url, "POST");

        let response = self
            .authorized(self.client.post(&url))
            .json(body)
            .send()
            .map_err(|e| BudgetError::Http(format!("Request to {} failed: {}", endpoint, e)))?;

        read_json(response, endpoint)
    }
}

impl BookkeepingApi for MoneybirdClient {
    fn ledger_accounts(&self) -> BudgetResult<Vec<LedgerAccount>> {
        let wire: Vec<WireLedgerAccount> = self.get_json("ledger_accounts.json", &[])?;
        Ok(wire.into_iter().map(Into::into).collect())
    }

    fn financial_mutations(&self, range: &DateRange) -> BudgetResult<Vec<Transaction>> {
        let filter = period_filter(range);
        let wire: Vec<WireFinancialMutation> =
            self.get_json("financial_mutations.json", &[("filter", filter)])?;
        Ok(wire.into_iter().map(WireFinancialMutation::into_transaction).collect())
    }

    fn documents(
        &self,
        collection: DocumentCollection,
        ids: &[String],
    ) -> BudgetResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = format!("documents/{}/synchronization.json", collection.path_segment());
        let wire: Vec<WireDocument> = self.post_json(&endpoint, &SynchronizationRequest { ids })?;
        Ok(wire.into_iter().map(Into::into).collect())
    }
}

/// `period:START..END` filter value for a range
pub fn period_filter(range: &DateRange) -> String {
    format!(
        "period:{}..{}",
        range.start.format("%Y%m%d"),
        range.end.format("%Y%m%d")
    )
}

fn read_json<T: DeserializeOwned>(response: Response, endpoint: &str) -> BudgetResult<T> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| {
            BudgetError::Http(format!("Failed to read response from {}: {}", endpoint, e))
        })?;

    if !status.is_success() {
        return Err(BudgetError::Api {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| {
            BudgetError::Json(format!("Failed to parse response from {}: {}", endpoint, e))
        })
}
