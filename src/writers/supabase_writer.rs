//! Supabase (PostgREST) client for inserting NDVI rows
//!
//! Rows are posted as a JSON array to `{url}/rest/v1/{table}`.

use reqwest::{Client, Request};
use std::time::Duration;
use tracing::debug;

use crate::config::SupabaseConfig;
use crate::error::{ProcessingError, Result};
use crate::models::NdviRecord;

/// Destination that accepts batches of records for a named table.
#[allow(async_fn_in_trait)]
pub trait RecordSink {
    /// Insert one batch; returns the number of rows the destination accepted
    async fn insert(&self, table: &str, batch: &[NdviRecord]) -> Result<usize>;
}

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    /// Without a timeout a request waits for the server to answer.
    pub fn new(base_url: String, api_key: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &SupabaseConfig, timeout: Option<Duration>) -> Result<Self> {
        Self::new(config.url.clone(), config.key.clone(), timeout)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Build the insert request without sending it
    pub fn build_insert_request(&self, table: &str, batch: &[NdviRecord]) -> Result<Request> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(batch)
            .build()?;

        Ok(request)
    }
}

impl RecordSink for SupabaseClient {
    async fn insert(&self, table: &str, batch: &[NdviRecord]) -> Result<usize> {
        let request = self.build_insert_request(table, batch)?;
        debug!("POST {} ({} rows)", request.url(), batch.len());

        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProcessingError::RemoteInsert {
                status: status.as_u16(),
                body,
            });
        }

        let inserted: Vec<serde_json::Value> = response.json().await?;
        Ok(inserted.len())
    }
}
