/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Shared state for the HTTP API.

use outpost::{PauseControl, DAL};

/// State handed to every request handler.
///
/// Holds a DAL over the dispatcher's database and a handle to the same
/// pause flag the runner consults, so a toggle through the API is seen by
/// the next dispatch tick.
#[derive(Clone)]
pub struct AppState {
    /// Data access layer over the message store.
    pub dal: DAL,
    /// Handle to the dispatch pause flag.
    pub pause: PauseControl,
    /// Cap on how many sent messages the read endpoint returns.
    pub sent_read_limit: i64,
}

impl AppState {
    /// Creates the API state.
    pub fn new(dal: DAL, pause: PauseControl, sent_read_limit: i64) -> Self {
        Self {
            dal,
            pause,
            sent_read_limit,
        }
    }
}
