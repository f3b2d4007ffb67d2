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

//! Tests for the dispatch cycle's commit discipline.
//!
//! The properties exercised here: only acknowledged messages transition to
//! sent, failed deliveries stay pending and are retried, and one message's
//! failure never affects the rest of the batch.

use outpost::{DeliveryOutcome, DispatchCycle, NewMessage};
use std::sync::Arc;

use super::{RecordingCache, ScriptedNotifier};
use crate::fixtures::get_or_init_fixture;

fn new_message(content: &str) -> NewMessage {
    NewMessage {
        content: content.to_string(),
        phone_number: "+15550100".to_string(),
    }
}

fn accepted(external_id: &str) -> DeliveryOutcome {
    DeliveryOutcome::Accepted {
        external_id: Some(external_id.to_string()),
    }
}

#[tokio::test]
async fn test_cycle_commits_accepted_and_leaves_rest() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    for content in ["a", "b", "c"] {
        dal.messages()
            .create(new_message(content))
            .await
            .expect("Failed to create message");
    }

    let notifier = Arc::new(ScriptedNotifier::new(vec![
        accepted("ext-a"),
        accepted("ext-b"),
    ]));
    let cache = Arc::new(RecordingCache::new());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    let stats = cycle.run().await.expect("Cycle failed");
    assert_eq!(stats.selected, 2);
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.unreachable, 0);
    assert_eq!(stats.committed, 2);

    // The two oldest were delivered and committed; the third is untouched.
    assert_eq!(notifier.delivered_contents(), vec!["a", "b"]);

    let sent = dal.messages().select_sent(10).await.expect("select sent");
    assert_eq!(sent.len(), 2);
    for message in &sent {
        assert!(message.sent_at.is_some());
    }

    let pending = dal
        .messages()
        .select_pending_batch(10)
        .await
        .expect("select pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content, "c");

    assert_eq!(cache.recorded_ids(), vec!["ext-a", "ext-b"]);
}

#[tokio::test]
async fn test_unreachable_message_stays_pending_without_cache_write() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    dal.messages()
        .create(new_message("d"))
        .await
        .expect("Failed to create message");

    let notifier = Arc::new(ScriptedNotifier::new(vec![DeliveryOutcome::Unreachable {
        reason: "connection refused".to_string(),
    }]));
    let cache = Arc::new(RecordingCache::new());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    let stats = cycle.run().await.expect("Cycle failed");
    assert_eq!(stats.selected, 1);
    assert_eq!(stats.delivered, 0);
    assert_eq!(stats.unreachable, 1);
    assert_eq!(stats.committed, 0);

    let pending = dal
        .messages()
        .select_pending_batch(10)
        .await
        .expect("select pending");
    assert_eq!(pending.len(), 1);
    assert!(pending[0].sent_at.is_none());

    assert!(cache.recorded_ids().is_empty());
}

#[tokio::test]
async fn test_rejected_delivery_does_not_block_batch() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    dal.messages()
        .create(new_message("fails"))
        .await
        .expect("Failed to create message");
    dal.messages()
        .create(new_message("succeeds"))
        .await
        .expect("Failed to create message");

    let notifier = Arc::new(ScriptedNotifier::new(vec![
        DeliveryOutcome::Rejected { status: 500 },
        accepted("ext-ok"),
    ]));
    let cache = Arc::new(RecordingCache::new());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    let stats = cycle.run().await.expect("Cycle failed");
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.committed, 1);

    let sent = dal.messages().select_sent(10).await.expect("select sent");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content, "succeeds");

    let pending = dal
        .messages()
        .select_pending_batch(10)
        .await
        .expect("select pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content, "fails");
}

#[tokio::test]
async fn test_accepted_without_external_id_still_commits() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    dal.messages()
        .create(new_message("opaque ack"))
        .await
        .expect("Failed to create message");

    // An acceptance whose body could not be parsed carries no external id.
    let notifier = Arc::new(ScriptedNotifier::new(vec![DeliveryOutcome::Accepted {
        external_id: None,
    }]));
    let cache = Arc::new(RecordingCache::new());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    let stats = cycle.run().await.expect("Cycle failed");
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.committed, 1);

    // Committed without any progress recording.
    assert!(cache.recorded_ids().is_empty());
    let sent = dal.messages().select_sent(10).await.expect("select sent");
    assert_eq!(sent.len(), 1);
}

#[tokio::test]
async fn test_cache_failure_never_blocks_commit() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    dal.messages()
        .create(new_message("cache down"))
        .await
        .expect("Failed to create message");

    let notifier = Arc::new(ScriptedNotifier::new(vec![accepted("ext-1")]));
    let cache = Arc::new(RecordingCache::failing());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    let stats = cycle.run().await.expect("Cycle failed");
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.committed, 1);

    let sent = dal.messages().select_sent(10).await.expect("select sent");
    assert_eq!(sent.len(), 1);
}

#[tokio::test]
async fn test_failed_delivery_retried_on_next_cycle() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    dal.messages()
        .create(new_message("eventually delivered"))
        .await
        .expect("Failed to create message");

    let notifier = Arc::new(ScriptedNotifier::new(vec![
        DeliveryOutcome::Unreachable {
            reason: "timeout".to_string(),
        },
        accepted("ext-retry"),
    ]));
    let cache = Arc::new(RecordingCache::new());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    let first = cycle.run().await.expect("Cycle failed");
    assert_eq!(first.unreachable, 1);
    assert_eq!(first.committed, 0);

    let second = cycle.run().await.expect("Cycle failed");
    assert_eq!(second.delivered, 1);
    assert_eq!(second.committed, 1);

    // Same message was attempted twice, then committed once.
    assert_eq!(
        notifier.delivered_contents(),
        vec!["eventually delivered", "eventually delivered"]
    );
    let sent = dal.messages().select_sent(10).await.expect("select sent");
    assert_eq!(sent.len(), 1);
}

#[tokio::test]
async fn test_cycle_on_empty_store_does_nothing() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    let notifier = Arc::new(ScriptedNotifier::new(vec![]));
    let cache = Arc::new(RecordingCache::new());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    let stats = cycle.run().await.expect("Cycle failed");
    assert_eq!(stats.selected, 0);
    assert_eq!(stats.committed, 0);
    assert_eq!(notifier.delivery_count(), 0);
}

#[tokio::test]
async fn test_delivery_payload_carries_full_content() {
    let fixture = get_or_init_fixture().await;
    let mut guard = fixture.lock().unwrap_or_else(|e| e.into_inner());
    guard.reset_database().await;
    guard.initialize().await;
    let dal = guard.get_dal();

    // Longer than the read-path clamp; the endpoint still gets all of it.
    let long_content = "y".repeat(300);
    dal.messages()
        .create(new_message(&long_content))
        .await
        .expect("Failed to create message");

    let notifier = Arc::new(ScriptedNotifier::new(vec![accepted("ext-long")]));
    let cache = Arc::new(RecordingCache::new());
    let cycle = DispatchCycle::new(dal.clone(), notifier.clone(), cache.clone(), 2);

    cycle.run().await.expect("Cycle failed");

    let delivered = notifier.delivered_contents();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].len(), 300);
}
