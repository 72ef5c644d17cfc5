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

//! Application configuration management.
//!
//! Persistent configuration stored in TOML format via confy: backend
//! connection settings and the dashboard session flag.

use serde::{Deserialize, Serialize};

const APP_NAME: &str = "wakedeck-desktop";

/// Application configuration stored in TOML format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the hosted server-record store (project URL).
    #[serde(default)]
    pub backend_url: String,

    /// API key sent with every store request.
    #[serde(default)]
    pub backend_api_key: String,

    /// Table holding the server records.
    #[serde(default = "default_table")]
    pub backend_table: String,

    /// Whether the dashboard password has already been entered.
    #[serde(default)]
    pub authenticated: bool,
}

fn default_table() -> String {
    "servers".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            backend_api_key: String::new(),
            backend_table: default_table(),
            authenticated: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk.
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, "config", self)
    }
}
