// Client for the recipe proxy service

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::models::RecipeData;
use crate::proxy::{ChatRequest, ProcessRecipeRequest};

#[derive(Debug, Clone)]
pub struct RecipeClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    data: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

impl RecipeClient {
    pub fn new(base_url: &str, request_timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
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

    pub async fn process_recipe(&self, recipe_url: &str) -> Result<RecipeData> {
        let url = format!("{}/api/process-recipe", self.base_url);
        let request = ProcessRecipeRequest {
            url: Some(recipe_url.to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send recipe request")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to process recipe");
        }

        let result = response
            .json::<RecipeData>()
            .await
            .context("Failed to parse recipe response")?;

        Ok(result)
    }

    /// Ask the assistant about the recipe at `recipe_url`; returns the reply text.
    pub async fn chat(&self, recipe_url: &str, query: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            url: Some(recipe_url.to_string()),
            query: Some(query.to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send chat request")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to get response");
        }

        let envelope = response
            .json::<ChatEnvelope>()
            .await
            .context("Failed to parse chat response")?;

        Ok(envelope.data.response)
    }

    /// Whether the proxy answers its health endpoint.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);

        self.client
            .get(&url)
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }
}
