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

//! Diesel schema definitions.
//!
//! The `unified` module holds table definitions typed to work against both
//! backends: identifiers are 16-byte `Binary` columns (BYTEA / BLOB) and
//! timestamps are naive-UTC `Timestamp` columns. The matching DDL lives in
//! `migrations/postgres` and `migrations/sqlite`.

/// Table definitions shared by the PostgreSQL and SQLite backends.
pub mod unified {
    diesel::table! {
        /// Outbound messages awaiting or past dispatch.
        messages (id) {
            /// 16-byte message identifier
            id -> Binary,
            /// Message body, stored in full
            content -> Text,
            /// Opaque destination identifier
            phone_number -> Text,
            /// Creation time, the FIFO ordering key
            created_at -> Timestamp,
            /// Delivery status flag; false = pending, true = sent
            sent -> Bool,
            /// Set exactly once, when the sent transition commits
            sent_at -> Nullable<Timestamp>,
        }
    }
}
