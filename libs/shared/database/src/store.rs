use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

// Pool bounds shared by every request in the process.
const POOL_MAX_CONNECTIONS: usize = 20;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the PostgREST interface of the relational store. All statements
/// are independent and auto-committing; there are no transaction boundaries.
pub struct StoreClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .pool_max_idle_per_host(POOL_MAX_CONNECTIONS)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .connect_timeout(ACQUIRE_TIMEOUT)
            .build()
            .expect("failed to build store HTTP client");

        Self {
            client,
            base_url: config.store_url.clone(),
            service_key: config.store_service_key.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.service_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.service_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store request: {} {}", method, url);

        let mut headers = self.headers();
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);
            return Err(anyhow!("Store error ({}): {}", status, error_text));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// GET returning rows plus the exact total behind them, for offset
    /// pagination. The total rides in the `Content-Range` header
    /// (`0-9/25` or `*/25`) when `Prefer: count=exact` is sent.
    pub async fn select_with_count<T>(&self, path: &str) -> Result<(Vec<T>, u64)>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store counted request: GET {}", url);

        let mut headers = self.headers();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));

        let response = self.client.get(&url).headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);
            return Err(anyhow!("Store error ({}): {}", status, error_text));
        }

        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|v| v.parse::<u64>().ok());

        let rows = response.json::<Vec<T>>().await?;
        let total = total.unwrap_or(rows.len() as u64);

        Ok((rows, total))
    }
}
