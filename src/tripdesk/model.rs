//! Core record types: [`Client`], [`Airline`], [`Flight`], and the tagged
//! [`Record`] union the store dispatches on.
//!
//! Records travel in two forms: the typed variants here, and the raw JSON
//! mapping ([`RawRecord`]) the store keeps in memory and the codec writes to
//! disk. `to_map`/`from_map` are the canonical conversion between the two.
//! `from_map` is strict — a persisted record missing a declared field is
//! rejected, unlike the lenient byte-level handling in the codec.

use crate::codec::RawRecord;
use crate::error::{Result, TripdeskError};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The three record kinds, matching the `type` tag in the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Client,
    Airline,
    Flight,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Client => "client",
            RecordType::Airline => "airline",
            RecordType::Flight => "flight",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = TripdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(RecordType::Client),
            "airline" => Ok(RecordType::Airline),
            "flight" => Ok(RecordType::Flight),
            other => Err(TripdeskError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub address_line3: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone_number: String,
}

impl Client {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            address_line3: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: String::new(),
            phone_number: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub id: i64,
    pub company_name: String,
}

impl Airline {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            company_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: i64,
    /// Soft reference to a client id; existence is never checked.
    pub client_id: i64,
    /// Soft reference to an airline id; existence is never checked.
    pub airline_id: i64,
    #[serde(with = "flight_date")]
    pub date: NaiveDateTime,
    pub start_city: String,
    pub end_city: String,
}

impl Flight {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            client_id: 0,
            airline_id: 0,
            date: Local::now().naive_local(),
            start_city: String::new(),
            end_city: String::new(),
        }
    }
}

/// ISO-8601 persistence for the flight date. Older data files carry the
/// space-separated form, so deserialization accepts both.
mod flight_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
    const LEGACY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&date.format(ISO_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(de)?;
        NaiveDateTime::parse_from_str(&raw, ISO_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, LEGACY_FORMAT))
            .map_err(serde::de::Error::custom)
    }
}

/// A record of any kind, dispatched on the `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Client(Client),
    Airline(Airline),
    Flight(Flight),
}

impl Record {
    /// Default-valued record of the given kind.
    pub fn new(kind: RecordType, id: i64) -> Self {
        match kind {
            RecordType::Client => Record::Client(Client::new(id)),
            RecordType::Airline => Record::Airline(Airline::new(id)),
            RecordType::Flight => Record::Flight(Flight::new(id)),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Record::Client(c) => c.id,
            Record::Airline(a) => a.id,
            Record::Flight(f) => f.id,
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            Record::Client(_) => RecordType::Client,
            Record::Airline(_) => RecordType::Airline,
            Record::Flight(_) => RecordType::Flight,
        }
    }

    /// Canonical persisted mapping: `type` and `id` lead, then the variant's
    /// declared fields.
    pub fn to_map(&self) -> Result<RawRecord> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(TripdeskError::InvalidRecord(format!(
                "record serialized to a non-object value: {}",
                other
            ))),
        }
    }

    /// Strict reconstruction from a persisted mapping. Every declared field
    /// must be present; keys outside the declared set are ignored.
    pub fn from_map(map: RawRecord) -> Result<Record> {
        serde_json::from_value(Value::Object(map))
            .map_err(|e| TripdeskError::InvalidRecord(e.to_string()))
    }
}
