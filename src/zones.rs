//! Zone Enumeration
//!
//! Pages through the hosted zone listing and returns the IDs of every
//! public zone with a well-formed identifier.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{AuditError, Result};
use crate::provider::DnsProvider;
use crate::types::ZoneId;

/// List the IDs of all public hosted zones, in listing order.
///
/// Private zones are skipped. Zones whose identifier does not parse are
/// logged and skipped without stopping the enumeration. Any provider error
/// aborts the whole listing.
pub async fn list_public_zone_ids<P>(provider: &P, page_size: u32) -> Result<Vec<ZoneId>>
where
    P: DnsProvider + ?Sized,
{
    let mut ids: Vec<ZoneId> = Vec::new();
    let mut seen: HashSet<ZoneId> = HashSet::new();
    let mut marker: Option<String> = None;

    loop {
        let page = provider.list_zones(page_size, marker.take()).await?;
        debug!(zones = page.zones.len(), truncated = page.truncated, "Fetched zone page");

        for zone in page.zones {
            if zone.private {
                continue;
            }

            let id = match ZoneId::parse(&zone.id) {
                Ok(id) => id,
                Err(e) => {
                    warn!(zone_id = %zone.id, error = %e, "Skipping malformed zone ID");
                    continue;
                }
            };

            if !seen.insert(id.clone()) {
                debug!(zone = %id, "Zone listed twice, keeping first occurrence");
                continue;
            }
            ids.push(id);
        }

        if !page.truncated {
            return Ok(ids);
        }

        marker = Some(
            page.next_marker
                .ok_or(AuditError::MissingContinuation("ListHostedZones"))?,
        );
    }
}
