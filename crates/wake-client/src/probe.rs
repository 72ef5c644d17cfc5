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

//! Outbound wake probe.
//!
//! A probe is a plain HTTP GET whose response status and body are ignored.
//! The target is typically a free-tier instance behind a cross-origin host,
//! so the only observable outcomes are "request settled" and "request
//! failed"; callers decide what a failure means.

use async_trait::async_trait;
use log::debug;

/// Errors from issuing a wake probe.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Transport-level failure (DNS, refused connection, timeout, TLS).
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// The probe target is not a usable URL.
    #[error("invalid probe url: {0}")]
    InvalidUrl(String),
}

/// Issues the outbound HTTP GET used to wake a server.
#[async_trait]
pub trait WakeProbe: Send + Sync {
    /// Fire a GET at `url` and wait for the request to settle.
    async fn wake(&self, url: &str) -> Result<(), ProbeError>;
}

/// reqwest-backed probe.
#[derive(Debug, Clone, Default)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Create a probe with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WakeProbe for HttpProbe {
    async fn wake(&self, url: &str) -> Result<(), ProbeError> {
        let target = reqwest::Url::parse(url).map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;
        // Any HTTP status counts as a wake; only transport failures surface.
        let response = self.client.get(target).send().await?;
        debug!("Wake probe to {} settled with status {}", url, response.status());
        Ok(())
    }
}
