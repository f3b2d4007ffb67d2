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

//! Database layer: connection pooling, schema, and cross-backend types.
//!
//! Migrations are embedded per backend and applied either through
//! [`Database::run_migrations`] (pooled, used at startup) or through the
//! synchronous helpers below (used by test fixtures holding a raw connection).

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod connection;
pub mod schema;
pub mod universal_types;

pub use connection::{AnyConnection, AnyPool, BackendType, Database};
pub use universal_types::{current_timestamp, UniversalTimestamp, UniversalUuid};

/// Embedded PostgreSQL migrations.
pub const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

/// Embedded SQLite migrations.
pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// Runs pending migrations on a raw PostgreSQL connection.
pub fn run_migrations_postgres(
    conn: &mut diesel::PgConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conn.run_pending_migrations(POSTGRES_MIGRATIONS)?;
    Ok(())
}

/// Runs pending migrations on a raw SQLite connection.
pub fn run_migrations_sqlite(
    conn: &mut diesel::SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conn.run_pending_migrations(SQLITE_MIGRATIONS)?;
    Ok(())
}
