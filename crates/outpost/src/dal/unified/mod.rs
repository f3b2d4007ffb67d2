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

//! Unified Data Access Layer with runtime backend selection
//!
//! This module provides a unified DAL implementation that works with both
//! PostgreSQL and SQLite backends, selecting the appropriate implementation
//! at runtime based on the database connection type.
//!
//! # Architecture
//!
//! Each DAL operation dispatches to a backend-specific implementation based
//! on the detected backend type. Backend-specific query functions use the
//! shared `schema::unified` table definitions, so queries are written once
//! per backend with identical shapes.
//!
//! # Example
//!
//! ```rust,ignore
//! use outpost::dal::DAL;
//! use outpost::database::Database;
//!
//! // Create database with runtime backend detection
//! let db = Database::new("postgres://localhost/outpost", "outpost", 10);
//! let dal = DAL::new(db);
//!
//! // Operations automatically use the correct backend
//! let batch = dal.messages().select_pending_batch(2).await?;
//! ```

use crate::database::{AnyPool, BackendType, Database};

// Sub-modules
pub mod messages;
pub mod models;

// Re-export DAL components
pub use messages::MessageDAL;

/// Helper macro for dispatching operations based on backend type.
///
/// This macro simplifies writing code that needs to execute different
/// implementations based on the database backend.
///
/// # Example
///
/// ```rust,ignore
/// dispatch_backend!(
///     self.dal.backend(),
///     self.select_pending_batch_postgres(limit).await,
///     self.select_pending_batch_sqlite(limit).await
/// )
/// ```
#[macro_export]
macro_rules! dispatch_backend {
    ($backend:expr, $postgres:expr, $sqlite:expr) => {
        match $backend {
            #[cfg(feature = "postgres")]
            $crate::database::BackendType::Postgres => $postgres,
            #[cfg(feature = "sqlite")]
            $crate::database::BackendType::Sqlite => $sqlite,
        }
    };
}

/// The unified Data Access Layer struct.
///
/// This struct provides access to all message store operations through a
/// single interface that works with both PostgreSQL and SQLite backends.
///
/// # Thread Safety
///
/// The `DAL` struct is `Clone` and can be safely shared between threads.
/// Each clone references the same underlying database connection pool.
#[derive(Clone, Debug)]
pub struct DAL {
    /// The database instance with connection pool
    pub database: Database,
}

impl DAL {
    /// Creates a new unified DAL instance.
    ///
    /// # Arguments
    ///
    /// * `database` - A Database instance configured for either PostgreSQL or SQLite
    ///
    /// # Returns
    ///
    /// A new DAL instance ready for database operations.
    pub fn new(database: Database) -> Self {
        DAL { database }
    }

    /// Returns the backend type for this DAL instance.
    pub fn backend(&self) -> BackendType {
        self.database.backend()
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns the connection pool.
    pub fn pool(&self) -> AnyPool {
        self.database.pool()
    }

    /// Returns a message DAL for message store operations.
    pub fn messages(&self) -> MessageDAL {
        MessageDAL::new(self)
    }
}
