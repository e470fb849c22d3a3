//! The persisted record and its lenient construction from an argument bag.

use crate::args::ArgumentBag;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Suffix appended to the action name to form the backing table name.
pub const ENTITY_TABLE_SUFFIX: &str = "_Dto";

/// Schema name the record is published under in OpenAPI output.
pub const RECORD_SCHEMA_NAME: &str = "FncDto";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: Uuid,
    pub descr: Option<String>,
    pub enabled: Option<bool>,
    pub upd_date: Option<NaiveDateTime>,
}

impl Record {
    /// Fresh record: new id, enabled, stamped now.
    pub fn new(descr: Option<String>) -> Self {
        Record {
            id: Uuid::new_v4(),
            descr,
            enabled: Some(true),
            upd_date: Some(now()),
        }
    }

    /// Cast the bag into a record. Absent fields take their defaults; a present field that
    /// does not parse fails the whole cast.
    pub fn from_args(args: &ArgumentBag) -> Option<Self> {
        let id = args.get_uuid("id").ok()?.unwrap_or_else(Uuid::new_v4);
        let descr = args.get_str("descr");
        let enabled = args.get_bool("enabled").ok()?.unwrap_or(true);
        let upd_date = match args.get_str("updDate") {
            Some(raw) => parse_timestamp(&raw)?,
            None => now(),
        };
        Some(Record {
            id,
            descr,
            enabled: Some(enabled),
            upd_date: Some(upd_date),
        })
    }
}

/// Current time at the store's microsecond precision.
fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

/// RFC 3339 (converted to UTC) or a naive `YYYY-MM-DD[T ]HH:MM:SS[.f]`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc().trunc_subsecs(6));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.trunc_subsecs(6))
}
