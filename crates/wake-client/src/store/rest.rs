// Copyright 2026 WakeDeck Desktop Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! REST implementation of the server-record store.
//!
//! Speaks the PostgREST dialect used by Supabase-hosted tables: filtering and
//! ordering go in the query string, the API key travels as both an `apikey`
//! header and a bearer token.

use async_trait::async_trait;
use log::debug;
use reqwest::header::AUTHORIZATION;
use serde_json::json;

use super::{ServerRecord, ServerStore, StoreError};

/// Connection settings for a PostgREST-style backend.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Table holding the server records.
    pub table: String,
}

impl RestStoreConfig {
    /// Settings for the default `servers` table.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: "servers".to_string(),
        }
    }
}

/// reqwest-backed store client.
#[derive(Debug)]
pub struct RestStore {
    client: reqwest::Client,
    config: RestStoreConfig,
}

impl RestStore {
    /// Create a client for the given backend.
    #[must_use]
    pub fn new(config: RestStoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ServerStore for RestStore {
    async fn list(&self) -> Result<Vec<ServerRecord>, StoreError> {
        let url = format!("{}?select=*&order=created_at.desc", self.table_url());
        debug!("Listing servers from {}", url);
        let response = self.authed(self.client.get(&url)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn insert(&self, url: &str, name: Option<&str>) -> Result<(), StoreError> {
        debug!("Inserting server {} into {}", url, self.config.table);
        let response = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&json!({ "url": url, "name": name }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let url = format!("{}?id=eq.{}", self.table_url(), id);
        debug!("Deleting server {} via {}", id, url);
        let response = self.authed(self.client.delete(&url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_strips_trailing_slash() {
        let store = RestStore::new(RestStoreConfig::new("https://abc.supabase.co/", "key"));
        assert_eq!(store.table_url(), "https://abc.supabase.co/rest/v1/servers");
    }

    #[test]
    fn table_url_honors_custom_table() {
        let mut config = RestStoreConfig::new("https://abc.supabase.co", "key");
        config.table = "wake_targets".to_string();
        let store = RestStore::new(config);
        assert_eq!(
            store.table_url(),
            "https://abc.supabase.co/rest/v1/wake_targets"
        );
    }
}
