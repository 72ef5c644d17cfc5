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

//! Transient status line shared by the mutation workflows.

use std::sync::Mutex;

/// Kind of a transient status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A mutation completed.
    Success,
    /// A store call failed.
    Error,
    /// Neutral informational text.
    Info,
}

/// Process-wide status text slot.
///
/// Every write bumps a generation; delayed clears pass the generation they
/// observed so a newer message is never wiped by an older timer.
#[derive(Debug, Default)]
pub struct StatusLine {
    inner: Mutex<StatusInner>,
}

#[derive(Debug, Default)]
struct StatusInner {
    message: Option<(String, StatusKind)>,
    generation: u64,
}

impl StatusLine {
    /// Create an empty status line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the current message, returning the new generation.
    pub fn set(&self, text: impl Into<String>, kind: StatusKind) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        inner.message = Some((text.into(), kind));
        inner.generation
    }

    /// Clear the line, unless a newer message replaced `generation`'s.
    pub fn clear_if_current(&self, generation: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.generation == generation {
            inner.message = None;
        }
    }

    /// The currently displayed message, if any.
    #[must_use]
    pub fn current(&self) -> Option<(String, StatusKind)> {
        self.inner.lock().unwrap().message.clone()
    }
}
