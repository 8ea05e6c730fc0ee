//! Serde adapter for marker creation timestamps.
//!
//! Timestamps are written as RFC 3339 in UTC (`2024-05-01T12:34:56.123456Z`).
//! Reads also accept any RFC 3339 offset and the naive ISO-8601 form that
//! older rows were stored with, which is taken to be UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Format a timestamp the way it is stored and returned to clients.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an ISO-8601 timestamp, with or without an offset.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(raw, NAIVE_ISO_FORMAT).map(|naive| naive.and_utc()),
    }
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

/// A `null` creation date is treated like a missing one.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse(&raw).map_err(serde::de::Error::custom),
        None => Ok(Utc::now()),
    }
}
