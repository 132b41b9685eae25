//! Audit Orchestrator
//!
//! Runs zone enumeration followed by per-zone record collection, one zone at
//! a time, and applies the record-stage error policy.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::{AuditError, Result};
use crate::provider::{DnsProvider, RecordCursor, RecordSetPage, ZonePage, PAGE_SIZE};
use crate::records::{collect_records, RecordFilter};
use crate::types::{Snapshot, ZoneId};
use crate::zones::list_public_zone_ids;

/// What to do when collecting a zone's records fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordErrorPolicy {
    /// Stop the run and return the error
    #[default]
    Abort,
    /// Drop the zone's partial entry, note the failure and move on
    Continue,
}

/// Audit run settings
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub page_size: u32,
    pub on_record_error: RecordErrorPolicy,
    /// Restrict collection to these zones; empty means all public zones
    pub zones: Vec<ZoneId>,
    /// Deadline applied to each provider call
    pub call_timeout: Option<Duration>,
    pub filter: RecordFilter,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            on_record_error: RecordErrorPolicy::default(),
            zones: Vec::new(),
            call_timeout: None,
            filter: RecordFilter::default(),
        }
    }
}

/// A zone whose records could not be collected
#[derive(Debug, Clone)]
pub struct ZoneFailure {
    pub zone: ZoneId,
    pub error: String,
}

/// Outcome of an audit run
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub snapshot: Snapshot,
    pub failed_zones: Vec<ZoneFailure>,
}

/// Provider wrapper enforcing a per-call deadline
struct Deadline<'a, P: ?Sized> {
    inner: &'a P,
    limit: Option<Duration>,
}

impl<P: ?Sized> Deadline<'_, P> {
    async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>> + Send,
    {
        match self.limit {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AuditError::Timeout {
                    operation,
                    elapsed: limit,
                })?,
            None => call.await,
        }
    }
}

#[async_trait]
impl<'a, P> DnsProvider for Deadline<'a, P>
where
    P: DnsProvider + ?Sized,
{
    async fn list_zones(&self, page_size: u32, marker: Option<String>) -> Result<ZonePage> {
        self.run("ListHostedZones", self.inner.list_zones(page_size, marker))
            .await
    }

    async fn list_record_sets(
        &self,
        zone: &ZoneId,
        page_size: u32,
        cursor: Option<RecordCursor>,
    ) -> Result<RecordSetPage> {
        self.run(
            "ListResourceRecordSets",
            self.inner.list_record_sets(zone, page_size, cursor),
        )
        .await
    }
}

/// Audits every public zone of a provider
pub struct Auditor<P> {
    provider: P,
    config: AuditConfig,
}

impl<P: DnsProvider> Auditor<P> {
    pub fn new(provider: P, config: AuditConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run a full audit.
    ///
    /// Zone enumeration errors always abort. Record collection errors abort
    /// or are recorded per zone depending on [`RecordErrorPolicy`].
    pub async fn run(&self) -> Result<AuditReport> {
        let provider = Deadline {
            inner: &self.provider,
            limit: self.config.call_timeout,
        };

        let mut zones = list_public_zone_ids(&provider, self.config.page_size).await?;
        info!(count = zones.len(), "Found public hosted zones");

        if !self.config.zones.is_empty() {
            for wanted in &self.config.zones {
                if !zones.contains(wanted) {
                    warn!(zone = %wanted, "Requested zone is not a listed public zone");
                }
            }
            zones.retain(|id| self.config.zones.contains(id));
        }

        let mut report = AuditReport::default();

        for zone in &zones {
            let collected = collect_records(
                &provider,
                zone,
                self.config.page_size,
                &self.config.filter,
                &mut report.snapshot,
            )
            .await;

            if let Err(e) = collected {
                match self.config.on_record_error {
                    RecordErrorPolicy::Abort => return Err(e),
                    RecordErrorPolicy::Continue => {
                        error!(zone = %zone, error = %e, "Failed to collect records");
                        report.snapshot.remove(zone);
                        report.failed_zones.push(ZoneFailure {
                            zone: zone.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            zones = report.snapshot.len(),
            records = report.snapshot.record_count(),
            failed = report.failed_zones.len(),
            "Audit complete"
        );

        Ok(report)
    }
}
