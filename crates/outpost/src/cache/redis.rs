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

//! Redis-backed progress cache.
//!
//! Stores the endpoint identifier and send time of the most recent
//! accepted delivery under fixed keys. The connection manager reconnects
//! on its own, so a dropped connection surfaces as a failed write on the
//! next call rather than a poisoned handle.

use super::ProgressCache;
use crate::database::UniversalTimestamp;
use crate::error::CacheError;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Key holding the endpoint identifier of the last accepted delivery.
const KEY_MESSAGE_ID: &str = "messageId";
/// Key holding the send time of the last accepted delivery.
const KEY_SENT_AT: &str = "sentAt";

/// Progress cache writing to a Redis server.
#[derive(Clone)]
pub struct RedisProgressCache {
    manager: ConnectionManager,
}

impl RedisProgressCache {
    /// Connects to the Redis server at `url` (for example
    /// `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::Connection(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self { manager })
    }
}

impl std::fmt::Debug for RedisProgressCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisProgressCache").finish()
    }
}

#[async_trait]
impl ProgressCache for RedisProgressCache {
    async fn record_progress(
        &self,
        external_id: &str,
        sent_at: UniversalTimestamp,
    ) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(KEY_MESSAGE_ID, external_id)
            .await
            .map_err(|e| CacheError::Write(e.to_string()))?;
        conn.set::<_, _, ()>(KEY_SENT_AT, sent_at.to_rfc3339())
            .await
            .map_err(|e| CacheError::Write(e.to_string()))?;
        Ok(())
    }
}
