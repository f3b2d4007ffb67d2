/*
 *  Copyright 2025 Colliery Software
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

//! Universal type wrappers for cross-database compatibility
//!
//! This module provides wrapper types that work as domain types and bind
//! directly in Diesel queries against either backend:
//!
//! - [`UniversalUuid`] maps to a 16-byte `Binary` column (BYTEA on
//!   PostgreSQL, BLOB on SQLite) and renders as the canonical hyphenated
//!   string everywhere else.
//! - [`UniversalTimestamp`] maps to a naive-UTC `Timestamp` column and
//!   renders as RFC 3339.
//!
//! Reading a `Binary` value that is not exactly 16 bytes fails
//! deserialization; the DAL surfaces that as a data-integrity error rather
//! than a connectivity error.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::{Binary, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Universal UUID wrapper for cross-database compatibility
///
/// Stored as a 16-byte binary value on both backends. The canonical string
/// form is used on every external surface (wire payloads, logs).
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Binary)]
pub struct UniversalUuid(pub Uuid);

impl UniversalUuid {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Convert to bytes for binary column storage
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Create from bytes (binary column); fails unless exactly 16 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, uuid::Error> {
        Uuid::from_slice(bytes).map(UniversalUuid)
    }
}

impl fmt::Display for UniversalUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UniversalUuid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<UniversalUuid> for Uuid {
    fn from(wrapper: UniversalUuid) -> Self {
        wrapper.0
    }
}

impl From<&UniversalUuid> for Uuid {
    fn from(wrapper: &UniversalUuid) -> Self {
        wrapper.0
    }
}

impl<DB> ToSql<Binary, DB> for UniversalUuid
where
    DB: Backend,
    [u8]: ToSql<Binary, DB>,
{
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, DB>) -> serialize::Result {
        self.0.as_bytes().as_slice().to_sql(out)
    }
}

impl<DB> FromSql<Binary, DB> for UniversalUuid
where
    DB: Backend,
    Vec<u8>: FromSql<Binary, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        let bytes = Vec::<u8>::from_sql(bytes)?;
        Uuid::from_slice(&bytes)
            .map(UniversalUuid)
            .map_err(|e| format!("Invalid UUID bytes in database: {}", e).into())
    }
}

/// Universal timestamp wrapper for cross-database compatibility
///
/// Stored as a naive UTC `TIMESTAMP` on both backends; all domain code works
/// in `DateTime<Utc>`.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Timestamp)]
pub struct UniversalTimestamp(pub DateTime<Utc>);

impl UniversalTimestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Convert to RFC3339 string for wire payloads
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Create from RFC3339 string
    pub fn from_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|dt| UniversalTimestamp(dt.with_timezone(&Utc)))
    }

    /// Convert to NaiveDateTime for TIMESTAMP column storage
    pub fn to_naive(&self) -> NaiveDateTime {
        self.0.naive_utc()
    }

    /// Create from NaiveDateTime (TIMESTAMP column)
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        use chrono::TimeZone;
        UniversalTimestamp(Utc.from_utc_datetime(&naive))
    }
}

impl fmt::Display for UniversalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for UniversalTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<UniversalTimestamp> for DateTime<Utc> {
    fn from(wrapper: UniversalTimestamp) -> Self {
        wrapper.0
    }
}

impl From<NaiveDateTime> for UniversalTimestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self::from_naive(naive)
    }
}

// Serializing the naive-UTC temporary forces per-backend impls: `reborrow`
// only exists for backends whose bind collector is `RawBytesBindCollector`
// (PostgreSQL), while SQLite's bind collector takes owned values via
// `set_value`.
#[cfg(feature = "postgres")]
impl ToSql<Timestamp, diesel::pg::Pg> for UniversalTimestamp {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, diesel::pg::Pg>) -> serialize::Result {
        let naive = self.0.naive_utc();
        <NaiveDateTime as ToSql<Timestamp, diesel::pg::Pg>>::to_sql(&naive, &mut out.reborrow())
    }
}

#[cfg(feature = "sqlite")]
impl ToSql<Timestamp, diesel::sqlite::Sqlite> for UniversalTimestamp {
    fn to_sql<'b>(
        &'b self,
        out: &mut Output<'b, '_, diesel::sqlite::Sqlite>,
    ) -> serialize::Result {
        // Must match Diesel's own `NaiveDateTime` SQLite encoding
        // (ENCODE_NAIVE_DATETIME_FORMAT) so values round-trip through the
        // generic `FromSql` impl below.
        out.set_value(self.0.naive_utc().format("%F %T%.f").to_string());
        Ok(serialize::IsNull::No)
    }
}

impl<DB> FromSql<Timestamp, DB> for UniversalTimestamp
where
    DB: Backend,
    NaiveDateTime: FromSql<Timestamp, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        let naive = NaiveDateTime::from_sql(bytes)?;
        Ok(UniversalTimestamp::from_naive(naive))
    }
}

/// Helper function for current timestamp
pub fn current_timestamp() -> UniversalTimestamp {
    UniversalTimestamp::now()
}
