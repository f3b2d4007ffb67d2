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

//! Single dispatch cycle over a batch of pending messages.

use crate::cache::ProgressCache;
use crate::dal::DAL;
use crate::database::{UniversalTimestamp, UniversalUuid};
use crate::error::StoreError;
use crate::notifier::{DeliveryOutcome, Notifier};
use std::sync::Arc;
use tracing::{debug, warn};

/// Counters describing what one cycle did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// Pending messages selected for this cycle.
    pub selected: usize,
    /// Deliveries the endpoint accepted.
    pub delivered: usize,
    /// Deliveries the endpoint answered with a non-acceptance status.
    pub rejected: usize,
    /// Deliveries that never reached the endpoint.
    pub unreachable: usize,
    /// Rows actually transitioned to sent by the commit.
    pub committed: usize,
}

/// Executes dispatch cycles against a message store.
///
/// Each call to [`run`](DispatchCycle::run) performs one full cycle:
/// batch selection, per-message delivery, best-effort progress recording,
/// and the commit of accepted messages. Delivery failures are absorbed
/// into the cycle's stats; only store failures surface as errors.
pub struct DispatchCycle {
    dal: DAL,
    notifier: Arc<dyn Notifier>,
    cache: Arc<dyn ProgressCache>,
    batch_size: i64,
}

impl DispatchCycle {
    /// Creates a cycle executor over the given store, notifier and cache.
    pub fn new(
        dal: DAL,
        notifier: Arc<dyn Notifier>,
        cache: Arc<dyn ProgressCache>,
        batch_size: i64,
    ) -> Self {
        Self {
            dal,
            notifier,
            cache,
            batch_size,
        }
    }

    /// Runs one dispatch cycle.
    ///
    /// Selects up to `batch_size` pending messages oldest first and
    /// attempts to deliver each one. A message whose delivery is rejected
    /// or unreachable stays pending; one message's failure never blocks
    /// the rest of the batch. After all attempts, exactly the accepted
    /// messages are committed as sent. A store error aborts the cycle and
    /// leaves every message pending for the next tick.
    pub async fn run(&self) -> Result<CycleStats, StoreError> {
        let batch = self
            .dal
            .messages()
            .select_pending_batch(self.batch_size)
            .await?;

        let mut stats = CycleStats {
            selected: batch.len(),
            ..CycleStats::default()
        };

        if batch.is_empty() {
            debug!("No pending messages to dispatch");
            return Ok(stats);
        }

        let mut accepted_ids: Vec<UniversalUuid> = Vec::new();

        for message in &batch {
            let payload = message.to_payload();
            match self.notifier.deliver(&payload).await {
                DeliveryOutcome::Accepted { external_id } => {
                    stats.delivered += 1;
                    accepted_ids.push(message.id);
                    debug!("Message {} accepted by endpoint", message.id);

                    if let Some(external_id) = external_id {
                        if let Err(e) = self
                            .cache
                            .record_progress(&external_id, UniversalTimestamp::now())
                            .await
                        {
                            warn!("Failed to record progress for message {}: {}", message.id, e);
                        }
                    }
                }
                DeliveryOutcome::Rejected { status } => {
                    stats.rejected += 1;
                    warn!(
                        "Message {} rejected by endpoint with status {}, leaving pending",
                        message.id, status
                    );
                }
                DeliveryOutcome::Unreachable { reason } => {
                    stats.unreachable += 1;
                    warn!(
                        "Endpoint unreachable for message {}, leaving pending: {}",
                        message.id, reason
                    );
                }
            }
        }

        if !accepted_ids.is_empty() {
            stats.committed = self.dal.messages().mark_sent(&accepted_ids).await?;
        }

        Ok(stats)
    }
}
