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

//! Dispatch cycle execution.
//!
//! A cycle selects a batch of pending messages, attempts delivery of each
//! one independently, and commits the sent transition for exactly the
//! messages the endpoint accepted. Everything else stays pending and is
//! picked up again on a later cycle.

mod cycle;

pub use cycle::{CycleStats, DispatchCycle};
