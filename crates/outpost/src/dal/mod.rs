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

//! Data Access Layer
//!
//! This module provides the data access layer for the message store, with
//! runtime selection between the PostgreSQL and SQLite backends.

#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub mod unified;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub use unified::{MessageDAL, DAL};
