//! DNS Provider Seam
//!
//! The two paginated read operations the audit needs from a hosted DNS
//! provider. The Route53 adapter lives in [`crate::route53`]; tests drive
//! the audit with an in-memory implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ZoneId;

/// Page size used for every listing request
pub const PAGE_SIZE: u32 = 100;

/// A hosted zone as returned by the zone listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZoneSummary {
    /// Raw provider identifier, usually `/hostedzone/<id>`
    pub id: String,
    pub private: bool,
}

/// One page of the zone listing
#[derive(Debug, Clone, Default)]
pub struct ZonePage {
    pub zones: Vec<HostedZoneSummary>,
    pub truncated: bool,
    pub next_marker: Option<String>,
}

/// A provider record set, before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub name: String,
    pub record_type: String,
    /// Literal values; empty for alias record sets
    pub values: Vec<String>,
    /// Alias target DNS name, if this is an alias record set
    pub alias_target: Option<String>,
}

/// Where to resume a record set listing.
///
/// Name and type always travel together. The identifier is only present
/// when the page boundary falls inside a group of routing-policy record
/// sets sharing the same name and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCursor {
    pub name: String,
    pub record_type: String,
    pub identifier: Option<String>,
}

/// One page of a zone's record set listing
#[derive(Debug, Clone, Default)]
pub struct RecordSetPage {
    pub record_sets: Vec<RecordSet>,
    pub truncated: bool,
    pub next_cursor: Option<RecordCursor>,
}

/// Read access to a hosted DNS provider
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List hosted zones, resuming from `marker` when given
    async fn list_zones(&self, page_size: u32, marker: Option<String>) -> Result<ZonePage>;

    /// List a zone's record sets, resuming from `cursor` when given
    async fn list_record_sets(
        &self,
        zone: &ZoneId,
        page_size: u32,
        cursor: Option<RecordCursor>,
    ) -> Result<RecordSetPage>;
}
