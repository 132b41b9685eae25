//! Audit Types
//!
//! Zone identifiers, the record type allow-list, auditable records and the
//! per-run snapshot they are collected into.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{AuditError, Result};

/// First character of every bare hosted zone ID
pub const ZONE_ID_MARKER: char = 'Z';

/// Strip exactly one trailing root-label separator
pub fn strip_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Bare hosted zone identifier (e.g. `Z0123456789ABC`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    /// Build from a bare identifier, enforcing the marker prefix
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !id.starts_with(ZONE_ID_MARKER) {
            return Err(AuditError::MalformedIdentifier(id));
        }
        Ok(Self(id))
    }

    /// Parse a provider zone ID.
    ///
    /// The provider returns composite paths of exactly three segments,
    /// `/hostedzone/<id>`, where the last segment is the identifier. A bare
    /// identifier with no separators is accepted as well.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split('/').collect();
        let bare = match segments.as_slice() {
            [id] => *id,
            ["", kind, id] if !kind.is_empty() => *id,
            _ => return Err(AuditError::MalformedIdentifier(raw.to_string())),
        };
        Self::new(bare)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record types retained by the audit. Anything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    #[allow(clippy::upper_case_acronyms)]
    AAAA,
    #[allow(clippy::upper_case_acronyms)]
    CNAME,
}

impl RecordType {
    /// Map a provider type string onto the allow-list
    pub fn from_provider(value: &str) -> Option<Self> {
        match value {
            "A" => Some(RecordType::A),
            "AAAA" => Some(RecordType::AAAA),
            "CNAME" => Some(RecordType::CNAME),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An auditable record: a host name and what it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnsRecord {
    /// Host name without the trailing root dot
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    /// Whether the value is a provider alias target
    pub alias: bool,
    /// Never empty; exactly one entry when `alias` is set
    pub values: Vec<String>,
}

impl DnsRecord {
    /// Record pointing at a provider alias target
    pub fn alias(name: &str, record_type: RecordType, target: &str) -> Self {
        Self {
            name: strip_root(name).to_string(),
            record_type,
            alias: true,
            values: vec![strip_root(target).to_string()],
        }
    }

    /// Record with literal values, or `None` when nothing is left to audit
    pub fn literal(name: &str, record_type: RecordType, values: Vec<String>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        Some(Self {
            name: strip_root(name).to_string(),
            record_type,
            alias: false,
            values,
        })
    }
}

/// Auditable records per zone, in provider listing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    zones: BTreeMap<ZoneId, Vec<DnsRecord>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the zone's record list wholesale, returning the previous one
    pub fn replace(&mut self, zone: &ZoneId, records: Vec<DnsRecord>) -> Option<Vec<DnsRecord>> {
        self.zones.insert(zone.clone(), records)
    }

    pub fn remove(&mut self, zone: &ZoneId) -> Option<Vec<DnsRecord>> {
        self.zones.remove(zone)
    }

    /// Records for a zone. `None` means the zone was never processed,
    /// an empty slice means it was audited and nothing qualified.
    pub fn get(&self, zone: &ZoneId) -> Option<&[DnsRecord]> {
        self.zones.get(zone).map(Vec::as_slice)
    }

    pub fn contains(&self, zone: &ZoneId) -> bool {
        self.zones.contains_key(zone)
    }

    /// Number of zones with an entry
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Total records across all zones
    pub fn record_count(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ZoneId, &[DnsRecord])> {
        self.zones.iter().map(|(id, records)| (id, records.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<ZoneId, Vec<DnsRecord>> {
        self.zones
    }
}
