use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::query::TableQuery;

/// Handle to the relational store, reached through its PostgREST interface.
///
/// Cheap to clone (the underlying `reqwest::Client` shares one connection
/// pool); constructed once at process start and injected into each service.
#[derive(Clone)]
pub struct PostgrestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl PostgrestClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to construct HTTP client");

        Self {
            client,
            base_url: config.postgrest_url.clone(),
            api_key: config.postgrest_api_key.clone(),
        }
    }

    fn headers(&self, prefer: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key).unwrap_or_else(|_| HeaderValue::from_static("")));
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(prefer) = prefer {
            headers.insert("Prefer", HeaderValue::from_static(prefer));
        }

        headers
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        prefer: Option<&'static str>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store request: {} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.headers(prefer));

        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);
            return Err(anyhow!("store error ({}): {}", status, error_text));
        }

        Ok(response)
    }

    /// Runs a read query, returning all matching rows.
    pub async fn select_many<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>> {
        let response = self.send(Method::GET, &query.to_path(), None, None).await?;
        Ok(response.json().await?)
    }

    /// Runs a read query, returning the first matching row if any.
    pub async fn select_one<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Option<T>> {
        let rows: Vec<T> = self.select_many(query).await?;
        Ok(rows.into_iter().next())
    }

    /// Exact row count for a query, via `Prefer: count=exact` and the
    /// `content-range` response header, without fetching rows.
    pub async fn count(&self, query: &TableQuery) -> Result<u64> {
        let url = format!("{}{}", self.base_url, query.to_path());
        debug!("Store count: {}", url);

        let mut headers = self.headers(Some("count=exact"));
        headers.insert("Range", HeaderValue::from_static("0-0"));

        let response = self.client.get(&url).headers(headers).send().await?;

        let status = response.status();
        // 206 Partial Content when rows exist, 200 when the range is empty.
        if !status.is_success() && status != StatusCode::PARTIAL_CONTENT {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);
            return Err(anyhow!("store error ({}): {}", status, error_text));
        }

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| anyhow!("missing content-range header in count response"))?;

        // Format is "0-0/42" or "*/0".
        let total = content_range
            .rsplit('/')
            .next()
            .and_then(|n| n.parse::<u64>().ok())
            .ok_or_else(|| anyhow!("unparseable content-range: {}", content_range))?;

        Ok(total)
    }

    /// Inserts one row and returns its persisted representation, including
    /// generated columns.
    pub async fn insert<T: DeserializeOwned>(&self, table: &str, row: Value) -> Result<T> {
        let path = TableQuery::new(table).to_path();
        let response = self
            .send(Method::POST, &path, Some(row), Some("return=representation"))
            .await?;

        let mut rows: Vec<T> = response.json().await?;
        if rows.is_empty() {
            return Err(anyhow!("insert into {} returned no representation", table));
        }
        Ok(rows.remove(0))
    }

    /// Applies a partial update to the rows matched by `query`. Returns the
    /// updated row, or `None` when nothing matched.
    pub async fn update<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
        patch: Value,
    ) -> Result<Option<T>> {
        let response = self
            .send(
                Method::PATCH,
                &query.to_path(),
                Some(patch),
                Some("return=representation"),
            )
            .await?;

        let rows: Vec<T> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    /// Deletes the rows matched by `query`, returning how many went away.
    pub async fn delete(&self, query: &TableQuery) -> Result<u64> {
        let response = self
            .send(
                Method::DELETE,
                &query.to_path(),
                None,
                Some("return=representation"),
            )
            .await?;

        let rows: Vec<Value> = response.json().await?;
        Ok(rows.len() as u64)
    }
}
