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

//! Best-effort recording of delivery progress.
//!
//! After the endpoint accepts a message, the cycle records the endpoint's
//! identifier and the send time through a [`ProgressCache`]. The cache is
//! not authoritative for delivery state; the store's `sent` flag is. A
//! failed write is logged by the caller and never affects the commit.

mod redis;

pub use self::redis::RedisProgressCache;

use crate::database::UniversalTimestamp;
use crate::error::CacheError;
use async_trait::async_trait;

/// Records the most recent accepted delivery.
#[async_trait]
pub trait ProgressCache: Send + Sync {
    /// Records the endpoint identifier and send time of an accepted
    /// delivery. Callers treat failures as non-fatal.
    async fn record_progress(
        &self,
        external_id: &str,
        sent_at: UniversalTimestamp,
    ) -> Result<(), CacheError>;
}

/// Cache that records nothing.
///
/// Used when no cache address is configured.
#[derive(Debug, Clone, Default)]
pub struct NoopProgressCache;

#[async_trait]
impl ProgressCache for NoopProgressCache {
    async fn record_progress(
        &self,
        _external_id: &str,
        _sent_at: UniversalTimestamp,
    ) -> Result<(), CacheError> {
        Ok(())
    }
}
