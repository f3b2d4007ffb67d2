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

//! Tests for message store operations.
//!
//! These cover the selection and transition rules the dispatch cycle
//! relies on: pending-only selection in creation order, the one-way sent
//! transition, and its idempotence.

use outpost::database::UniversalUuid;
use outpost::NewMessage;

use crate::fixtures::get_or_init_fixture;

fn new_message(content: &str, phone_number: &str) -> NewMessage {
    NewMessage {
        content: content.to_string(),
        phone_number: phone_number.to_string(),
    }
}

#[tokio::test]
async fn test_create_message_starts_pending() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    let message = dal
        .messages()
        .create(new_message("hello", "+15550100"))
        .await
        .expect("Failed to create message");

    assert!(!message.sent);
    assert!(message.sent_at.is_none());
    assert!(message.is_pending());
    assert_eq!(message.content, "hello");
    assert_eq!(message.phone_number, "+15550100");

    let other = dal
        .messages()
        .create(new_message("world", "+15550101"))
        .await
        .expect("Failed to create message");

    assert_ne!(message.id, other.id, "Identifiers must be unique");
}

#[tokio::test]
async fn test_select_pending_batch_is_oldest_first() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    for content in ["first", "second", "third"] {
        dal.messages()
            .create(new_message(content, "+15550100"))
            .await
            .expect("Failed to create message");
    }

    let batch = dal
        .messages()
        .select_pending_batch(2)
        .await
        .expect("Failed to select batch");

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].content, "first");
    assert_eq!(batch[1].content, "second");
}

#[tokio::test]
async fn test_select_pending_batch_excludes_sent() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    let delivered = dal
        .messages()
        .create(new_message("already delivered", "+15550100"))
        .await
        .expect("Failed to create message");
    let waiting = dal
        .messages()
        .create(new_message("still waiting", "+15550101"))
        .await
        .expect("Failed to create message");

    dal.messages()
        .mark_sent(&[delivered.id])
        .await
        .expect("Failed to mark sent");

    let batch = dal
        .messages()
        .select_pending_batch(10)
        .await
        .expect("Failed to select batch");

    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].id, waiting.id);
}

#[tokio::test]
async fn test_mark_sent_sets_sent_at_and_counts_rows() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    let a = dal
        .messages()
        .create(new_message("a", "+15550100"))
        .await
        .expect("Failed to create message");
    let b = dal
        .messages()
        .create(new_message("b", "+15550101"))
        .await
        .expect("Failed to create message");

    let committed = dal
        .messages()
        .mark_sent(&[a.id, b.id])
        .await
        .expect("Failed to mark sent");
    assert_eq!(committed, 2);

    let sent = dal
        .messages()
        .select_sent(10)
        .await
        .expect("Failed to select sent");
    assert_eq!(sent.len(), 2);
    for message in &sent {
        assert!(message.sent);
        assert!(
            message.sent_at.is_some(),
            "Sent messages must carry a send time"
        );
    }
}

#[tokio::test]
async fn test_mark_sent_is_idempotent() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    let message = dal
        .messages()
        .create(new_message("once only", "+15550100"))
        .await
        .expect("Failed to create message");

    let first = dal
        .messages()
        .mark_sent(&[message.id])
        .await
        .expect("Failed to mark sent");
    assert_eq!(first, 1);

    let sent_at_after_first = dal
        .messages()
        .select_sent(10)
        .await
        .expect("Failed to select sent")[0]
        .sent_at;

    // A repeated commit is a no-op and must not touch sent_at.
    let second = dal
        .messages()
        .mark_sent(&[message.id])
        .await
        .expect("Failed to mark sent again");
    assert_eq!(second, 0);

    let sent_at_after_second = dal
        .messages()
        .select_sent(10)
        .await
        .expect("Failed to select sent")[0]
        .sent_at;
    assert_eq!(sent_at_after_first, sent_at_after_second);
}

#[tokio::test]
async fn test_mark_sent_ignores_unknown_ids() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    let committed = dal
        .messages()
        .mark_sent(&[UniversalUuid::new_v4()])
        .await
        .expect("Failed to mark sent");
    assert_eq!(committed, 0);
}

#[tokio::test]
async fn test_select_sent_honors_cap() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    let mut ids = Vec::new();
    for i in 0..5 {
        let message = dal
            .messages()
            .create(new_message(&format!("message {}", i), "+15550100"))
            .await
            .expect("Failed to create message");
        ids.push(message.id);
    }
    dal.messages()
        .mark_sent(&ids)
        .await
        .expect("Failed to mark sent");

    let sent = dal
        .messages()
        .select_sent(3)
        .await
        .expect("Failed to select sent");
    assert_eq!(sent.len(), 3);
}

#[tokio::test]
async fn test_count_pending_tracks_transitions() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    assert_eq!(
        dal.messages().count_pending().await.expect("count"),
        0
    );

    let a = dal
        .messages()
        .create(new_message("a", "+15550100"))
        .await
        .expect("Failed to create message");
    dal.messages()
        .create(new_message("b", "+15550101"))
        .await
        .expect("Failed to create message");

    assert_eq!(
        dal.messages().count_pending().await.expect("count"),
        2
    );

    dal.messages()
        .mark_sent(&[a.id])
        .await
        .expect("Failed to mark sent");

    assert_eq!(
        dal.messages().count_pending().await.expect("count"),
        1
    );
}
