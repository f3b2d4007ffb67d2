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

//! Dispatch cycle and runner tests, driven by scripted endpoint outcomes.

pub mod cycle;

use async_trait::async_trait;
use outpost::database::UniversalTimestamp;
use outpost::{CacheError, DeliveryOutcome, MessagePayload, Notifier, ProgressCache};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Notifier replaying a scripted sequence of outcomes.
///
/// Records every payload it was asked to deliver. Once the script runs
/// out, every further delivery is accepted without an external id.
pub struct ScriptedNotifier {
    script: Mutex<VecDeque<DeliveryOutcome>>,
    deliveries: Mutex<Vec<MessagePayload>>,
}

impl ScriptedNotifier {
    pub fn new(outcomes: Vec<DeliveryOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn delivered_contents(&self) -> Vec<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|payload| payload.content.clone())
            .collect()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for ScriptedNotifier {
    async fn deliver(&self, payload: &MessagePayload) -> DeliveryOutcome {
        self.deliveries.lock().unwrap().push(payload.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DeliveryOutcome::Accepted { external_id: None })
    }
}

/// Progress cache recording every write, optionally failing them all.
#[derive(Default)]
pub struct RecordingCache {
    records: Mutex<Vec<(String, UniversalTimestamp)>>,
    fail_writes: bool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn recorded_ids(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(external_id, _)| external_id.clone())
            .collect()
    }
}

#[async_trait]
impl ProgressCache for RecordingCache {
    async fn record_progress(
        &self,
        external_id: &str,
        sent_at: UniversalTimestamp,
    ) -> Result<(), CacheError> {
        if self.fail_writes {
            return Err(CacheError::Write("simulated cache outage".to_string()));
        }
        self.records
            .lock()
            .unwrap()
            .push((external_id.to_string(), sent_at));
        Ok(())
    }
}
