// Client for the upstream recipe service

use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;

/// Talks to the recipe service. Bodies are passed through as raw JSON.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST {base}/add_and_process_recipe?url=...`
    pub async fn add_and_process_recipe(&self, recipe_url: &str) -> Result<Value, reqwest::Error> {
        let url = format!("{}/add_and_process_recipe", self.base_url);

        self.client
            .post(&url)
            .query(&[("url", recipe_url)])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?
            .json::<Value>()
            .await
    }

    /// `GET {base}/chat?url=...&query=...`
    pub async fn chat(&self, recipe_url: &str, query: &str) -> Result<Value, reqwest::Error> {
        let url = format!("{}/chat", self.base_url);

        self.client
            .get(&url)
            .query(&[("url", recipe_url), ("query", query)])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?
            .json::<Value>()
            .await
    }
}
