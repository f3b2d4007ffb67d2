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

//! Message Model
//!
//! This module defines domain structures for outbound messages. A message is
//! created pending, selected oldest-first by the dispatch cycle, delivered to
//! the notification endpoint, and transitioned exactly once to the terminal
//! `sent` state.
//!
//! The wire representation ([`MessagePayload`]) is shared by the outbound
//! delivery POST and the sent-message read endpoint: camelCase field names,
//! canonical UUID string identifiers, RFC 3339 timestamps. Content is carried
//! in full on the delivery path; the read path clamps it to
//! [`READ_CONTENT_LIMIT`] characters.

use crate::database::universal_types::{UniversalTimestamp, UniversalUuid};
use serde::{Deserialize, Serialize};

/// Maximum number of content characters exposed on the read path.
pub const READ_CONTENT_LIMIT: usize = 128;

/// Represents an outbound message (domain type).
///
/// `sent` and `sent_at` move together: both are written by the single store
/// update that commits the pending to sent transition. A message with
/// `sent = false` always has `sent_at = None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub id: UniversalUuid,
    /// Message body, stored in full
    pub content: String,
    /// Opaque destination identifier
    pub phone_number: String,
    /// Creation time, the FIFO ordering key
    pub created_at: UniversalTimestamp,
    /// Delivery status flag; the only legal transition is false to true
    pub sent: bool,
    /// Set exactly once, when the sent transition commits
    pub sent_at: Option<UniversalTimestamp>,
}

/// Structure for creating new messages (domain type).
///
/// The identifier, creation time, and pending status are assigned by the
/// store on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Message body
    pub content: String,
    /// Opaque destination identifier
    pub phone_number: String,
}

impl Message {
    /// Returns true while the message has not been dispatched.
    pub fn is_pending(&self) -> bool {
        !self.sent
    }

    /// Returns the content clamped to [`READ_CONTENT_LIMIT`] characters.
    ///
    /// The clamp is `min(length, limit)` on character boundaries: shorter
    /// content comes back whole, and multi-byte characters are never split.
    pub fn clamped_content(&self) -> &str {
        match self.content.char_indices().nth(READ_CONTENT_LIMIT) {
            Some((index, _)) => &self.content[..index],
            None => &self.content,
        }
    }

    /// Builds the outbound delivery payload, carrying the full content.
    pub fn to_payload(&self) -> MessagePayload {
        MessagePayload {
            id: self.id.to_string(),
            content: self.content.clone(),
            phone_number: self.phone_number.clone(),
            created_at: self.created_at,
            sent_at: self.sent_at,
        }
    }

    /// Builds the read-path view, clamping the content.
    pub fn to_read_view(&self) -> MessagePayload {
        MessagePayload {
            id: self.id.to_string(),
            content: self.clamped_content().to_string(),
            phone_number: self.phone_number.clone(),
            created_at: self.created_at,
            sent_at: self.sent_at,
        }
    }
}

/// Wire representation of a message.
///
/// Serialized shape: `{id, content, phoneNumber, createdAt, sentAt}` with the
/// identifier as the canonical hyphenated UUID string and `sentAt` omitted
/// while the message is pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    /// Canonical UUID string
    pub id: String,
    /// Message body
    pub content: String,
    /// Opaque destination identifier
    pub phone_number: String,
    /// Creation time
    pub created_at: UniversalTimestamp,
    /// Dispatch time, absent for pending messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<UniversalTimestamp>,
}
