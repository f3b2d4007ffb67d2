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

//! Row models for the unified DAL.
//!
//! These types carry Diesel derives against the `schema::unified` tables and
//! are converted to the domain types in [`crate::models`] at the DAL
//! boundary. Field order must match the `diesel::table!` column order.

use crate::database::schema::unified::messages;
use crate::database::universal_types::{UniversalTimestamp, UniversalUuid};
use crate::models::Message;
use diesel::prelude::*;

/// Database row for a message.
#[derive(Debug, Clone, Queryable)]
pub struct UnifiedMessage {
    pub id: UniversalUuid,
    pub content: String,
    pub phone_number: String,
    pub created_at: UniversalTimestamp,
    pub sent: bool,
    pub sent_at: Option<UniversalTimestamp>,
}

/// Insertable row for a new pending message.
///
/// `sent_at` is omitted; the column stays NULL until the sent transition
/// commits.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewUnifiedMessage {
    pub id: UniversalUuid,
    pub content: String,
    pub phone_number: String,
    pub created_at: UniversalTimestamp,
    pub sent: bool,
}

impl From<UnifiedMessage> for Message {
    fn from(row: UnifiedMessage) -> Self {
        Message {
            id: row.id,
            content: row.content,
            phone_number: row.phone_number,
            created_at: row.created_at,
            sent: row.sent,
            sent_at: row.sent_at,
        }
    }
}
