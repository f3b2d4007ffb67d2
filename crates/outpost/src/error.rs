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

//! Error types for the Outpost dispatcher.
//!
//! Failures are partitioned by how the dispatch cycle must react to them:
//!
//! - [`StoreError`]: the message store could not complete an operation. The
//!   current cycle aborts and the scheduler retries on the next tick.
//! - [`CacheError`]: the progress cache could not be written. Logged and
//!   dropped; never propagated into dispatch control flow.
//! - [`ConfigError`]: invalid configuration or a failed startup step. Only
//!   surfaced while building a runner, never during steady-state dispatch.
//!
//! Delivery failures are not errors at all: the notification client reports
//! them as [`DeliveryOutcome`](crate::notifier::DeliveryOutcome) variants so
//! the cycle can decide per message what to commit.

use thiserror::Error;

/// Errors from message store operations.
///
/// Connectivity problems (`ConnectionPool`, `Database`) are retryable: the
/// affected messages stay pending and a later cycle picks them up again.
/// `DataIntegrity` is not retryable - it means a stored row holds bytes that
/// do not decode into a valid identifier, i.e. corrupted or foreign data.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to check out a connection from the pool.
    #[error("Connection pool error: {0}")]
    ConnectionPool(String),

    /// A query failed inside the database.
    #[error("Database error: {0}")]
    Database(diesel::result::Error),

    /// A stored row could not be decoded into its domain representation.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            // Row decoding failures indicate corrupted or foreign rows,
            // not a transient connectivity condition.
            diesel::result::Error::DeserializationError(e) => {
                StoreError::DataIntegrity(e.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Errors from the best-effort progress cache.
///
/// The cache is an observer of dispatch, not a participant: every variant is
/// logged at warn level by the caller and then discarded.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Could not establish or re-establish the cache connection.
    #[error("Cache connection error: {0}")]
    Connection(String),

    /// A write was attempted and failed.
    #[error("Cache write failed: {0}")]
    Write(String),
}

/// Errors raised while validating configuration or wiring up a runner.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is missing or out of range.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    /// Database migrations could not be applied at startup.
    #[error("Migration failed: {0}")]
    Migration(String),
}
