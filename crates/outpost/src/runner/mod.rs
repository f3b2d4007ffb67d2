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

//! Long-running dispatch scheduling.
//!
//! The [`DispatchRunner`] owns the timer loop that fires dispatch cycles,
//! the pause flag the control endpoint flips, and the shutdown path that
//! waits for an in-flight cycle to finish.

mod dispatch_runner;

pub use dispatch_runner::config::{
    DispatchRunnerBuilder, DispatchRunnerConfig, DispatchRunnerConfigBuilder,
};
pub use dispatch_runner::{DispatchRunner, PauseControl};
