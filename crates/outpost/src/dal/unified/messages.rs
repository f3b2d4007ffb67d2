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

//! Unified Message DAL with runtime backend selection
//!
//! This module provides the message store operations consumed by the
//! dispatch cycle and the read endpoint:
//!
//! - batch selection of pending messages, oldest first
//! - the atomic pending to sent transition
//! - the capped sent-message read view
//! - creation and backlog counting
//!
//! Selection never returns sent rows, and the sent transition only touches
//! rows that are still pending, so repeating a commit is a no-op.

use super::models::{NewUnifiedMessage, UnifiedMessage};
use super::DAL;
use crate::database::schema::unified::messages;
use crate::database::universal_types::{UniversalTimestamp, UniversalUuid};
use crate::error::StoreError;
use crate::models::{Message, NewMessage};
use diesel::prelude::*;

/// Data access layer for message store operations with runtime backend selection.
#[derive(Clone)]
pub struct MessageDAL<'a> {
    dal: &'a DAL,
}

impl<'a> MessageDAL<'a> {
    /// Creates a new MessageDAL instance.
    pub fn new(dal: &'a DAL) -> Self {
        Self { dal }
    }

    /// Creates a new pending message.
    ///
    /// The identifier is generated here, `created_at` is set to now, and the
    /// row starts with `sent = false` and no `sent_at`.
    pub async fn create(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        crate::dispatch_backend!(
            self.dal.backend(),
            self.create_postgres(new_message).await,
            self.create_sqlite(new_message).await
        )
    }

    #[cfg(feature = "postgres")]
    async fn create_postgres(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let conn = self
            .dal
            .database
            .get_postgres_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let new_row = NewUnifiedMessage {
            id: UniversalUuid::new_v4(),
            content: new_message.content,
            phone_number: new_message.phone_number,
            created_at: UniversalTimestamp::now(),
            sent: false,
        };

        let result: UnifiedMessage = conn
            .interact(move |conn| {
                diesel::insert_into(messages::table)
                    .values(&new_row)
                    .get_result(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(result.into())
    }

    #[cfg(feature = "sqlite")]
    async fn create_sqlite(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let conn = self
            .dal
            .database
            .get_sqlite_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let new_row = NewUnifiedMessage {
            id: UniversalUuid::new_v4(),
            content: new_message.content,
            phone_number: new_message.phone_number,
            created_at: UniversalTimestamp::now(),
            sent: false,
        };

        let result: UnifiedMessage = conn
            .interact(move |conn| {
                diesel::insert_into(messages::table)
                    .values(&new_row)
                    .get_result(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(result.into())
    }

    /// Selects at most `limit` pending messages, oldest first.
    ///
    /// Ordering is `created_at` ascending with ties broken by identifier
    /// ascending, so repeated selections are deterministic. Sent messages are
    /// never returned.
    pub async fn select_pending_batch(&self, limit: i64) -> Result<Vec<Message>, StoreError> {
        crate::dispatch_backend!(
            self.dal.backend(),
            self.select_pending_batch_postgres(limit).await,
            self.select_pending_batch_sqlite(limit).await
        )
    }

    #[cfg(feature = "postgres")]
    async fn select_pending_batch_postgres(&self, limit: i64) -> Result<Vec<Message>, StoreError> {
        let conn = self
            .dal
            .database
            .get_postgres_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let results: Vec<UnifiedMessage> = conn
            .interact(move |conn| {
                messages::table
                    .filter(messages::sent.eq(false))
                    .order((messages::created_at.asc(), messages::id.asc()))
                    .limit(limit)
                    .load(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(results.into_iter().map(Into::into).collect())
    }

    #[cfg(feature = "sqlite")]
    async fn select_pending_batch_sqlite(&self, limit: i64) -> Result<Vec<Message>, StoreError> {
        let conn = self
            .dal
            .database
            .get_sqlite_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let results: Vec<UnifiedMessage> = conn
            .interact(move |conn| {
                messages::table
                    .filter(messages::sent.eq(false))
                    .order((messages::created_at.asc(), messages::id.asc()))
                    .limit(limit)
                    .load(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(results.into_iter().map(Into::into).collect())
    }

    /// Transitions the given messages from pending to sent.
    ///
    /// Sets `sent = true` and `sent_at = now` in a single transaction for
    /// every identifier in the set whose row is still pending. Identifiers
    /// that are unknown or already sent are untouched, which makes the call
    /// idempotent. Returns the number of rows actually transitioned.
    pub async fn mark_sent(&self, ids: &[UniversalUuid]) -> Result<usize, StoreError> {
        crate::dispatch_backend!(
            self.dal.backend(),
            self.mark_sent_postgres(ids.to_vec()).await,
            self.mark_sent_sqlite(ids.to_vec()).await
        )
    }

    #[cfg(feature = "postgres")]
    async fn mark_sent_postgres(&self, ids: Vec<UniversalUuid>) -> Result<usize, StoreError> {
        let conn = self
            .dal
            .database
            .get_postgres_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let now = UniversalTimestamp::now();
        let updated: usize = conn
            .interact(move |conn| {
                conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    diesel::update(
                        messages::table
                            .filter(messages::id.eq_any(ids))
                            .filter(messages::sent.eq(false)),
                    )
                    .set((messages::sent.eq(true), messages::sent_at.eq(Some(now))))
                    .execute(conn)
                })
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(updated)
    }

    #[cfg(feature = "sqlite")]
    async fn mark_sent_sqlite(&self, ids: Vec<UniversalUuid>) -> Result<usize, StoreError> {
        let conn = self
            .dal
            .database
            .get_sqlite_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let now = UniversalTimestamp::now();
        let updated: usize = conn
            .interact(move |conn| {
                conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    diesel::update(
                        messages::table
                            .filter(messages::id.eq_any(ids))
                            .filter(messages::sent.eq(false)),
                    )
                    .set((messages::sent.eq(true), messages::sent_at.eq(Some(now))))
                    .execute(conn)
                })
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(updated)
    }

    /// Selects at most `limit` sent messages for the read path.
    ///
    /// Ordered by creation time for a stable view. The cap keeps the read
    /// endpoint from loading an unbounded sent-set into memory.
    pub async fn select_sent(&self, limit: i64) -> Result<Vec<Message>, StoreError> {
        crate::dispatch_backend!(
            self.dal.backend(),
            self.select_sent_postgres(limit).await,
            self.select_sent_sqlite(limit).await
        )
    }

    #[cfg(feature = "postgres")]
    async fn select_sent_postgres(&self, limit: i64) -> Result<Vec<Message>, StoreError> {
        let conn = self
            .dal
            .database
            .get_postgres_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let results: Vec<UnifiedMessage> = conn
            .interact(move |conn| {
                messages::table
                    .filter(messages::sent.eq(true))
                    .order((messages::created_at.asc(), messages::id.asc()))
                    .limit(limit)
                    .load(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(results.into_iter().map(Into::into).collect())
    }

    #[cfg(feature = "sqlite")]
    async fn select_sent_sqlite(&self, limit: i64) -> Result<Vec<Message>, StoreError> {
        let conn = self
            .dal
            .database
            .get_sqlite_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let results: Vec<UnifiedMessage> = conn
            .interact(move |conn| {
                messages::table
                    .filter(messages::sent.eq(true))
                    .order((messages::created_at.asc(), messages::id.asc()))
                    .limit(limit)
                    .load(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(results.into_iter().map(Into::into).collect())
    }

    /// Counts pending messages (for cycle logging).
    pub async fn count_pending(&self) -> Result<i64, StoreError> {
        crate::dispatch_backend!(
            self.dal.backend(),
            self.count_pending_postgres().await,
            self.count_pending_sqlite().await
        )
    }

    #[cfg(feature = "postgres")]
    async fn count_pending_postgres(&self) -> Result<i64, StoreError> {
        let conn = self
            .dal
            .database
            .get_postgres_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let count: i64 = conn
            .interact(move |conn| {
                messages::table
                    .filter(messages::sent.eq(false))
                    .count()
                    .get_result(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(count)
    }

    #[cfg(feature = "sqlite")]
    async fn count_pending_sqlite(&self) -> Result<i64, StoreError> {
        let conn = self
            .dal
            .database
            .get_sqlite_connection()
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))?;

        let count: i64 = conn
            .interact(move |conn| {
                messages::table
                    .filter(messages::sent.eq(false))
                    .count()
                    .get_result(conn)
            })
            .await
            .map_err(|e| StoreError::ConnectionPool(e.to_string()))??;

        Ok(count)
    }
}
