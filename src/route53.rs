//! Route53 Adapter
//!
//! Implements [`DnsProvider`] over the AWS SDK Route53 client.
//! Credentials and region come from the standard AWS configuration chain.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_route53::types::{ResourceRecordSet, RrType};
use aws_sdk_route53::Client;
use tracing::debug;

use crate::error::{AuditError, Result};
use crate::provider::{
    DnsProvider, HostedZoneSummary, RecordCursor, RecordSet, RecordSetPage, ZonePage,
};
use crate::types::ZoneId;

/// Route53 client wrapper
pub struct Route53Provider {
    client: Client,
}

impl Route53Provider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the shared AWS config, optionally pinning region and profile
    pub async fn from_env(region: Option<String>, profile: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;
        debug!(region = ?config.region(), "Loaded AWS configuration");

        Self::new(Client::new(&config))
    }
}

fn max_items(page_size: u32) -> i32 {
    i32::try_from(page_size).unwrap_or(i32::MAX)
}

fn to_record_set(set: ResourceRecordSet) -> RecordSet {
    RecordSet {
        name: set.name,
        record_type: set.r#type.as_str().to_string(),
        values: set
            .resource_records
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.value)
            .collect(),
        alias_target: set.alias_target.map(|a| a.dns_name),
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_zones(&self, page_size: u32, marker: Option<String>) -> Result<ZonePage> {
        debug!(marker = ?marker, "ListHostedZones");

        let output = self
            .client
            .list_hosted_zones()
            .max_items(max_items(page_size))
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| AuditError::api("ListHostedZones", aws_sdk_route53::Error::from(e)))?;

        let zones = output
            .hosted_zones
            .into_iter()
            .map(|hz| HostedZoneSummary {
                id: hz.id,
                private: hz.config.map(|c| c.private_zone).unwrap_or(false),
            })
            .collect();

        Ok(ZonePage {
            zones,
            truncated: output.is_truncated,
            next_marker: output.next_marker,
        })
    }

    async fn list_record_sets(
        &self,
        zone: &ZoneId,
        page_size: u32,
        cursor: Option<RecordCursor>,
    ) -> Result<RecordSetPage> {
        debug!(zone = %zone, cursor = ?cursor, "ListResourceRecordSets");

        let (start_name, start_type, start_identifier) = match cursor {
            Some(c) => (
                Some(c.name),
                Some(RrType::from(c.record_type.as_str())),
                c.identifier,
            ),
            None => (None, None, None),
        };

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone.as_str())
            .max_items(max_items(page_size))
            .set_start_record_name(start_name)
            .set_start_record_type(start_type)
            .set_start_record_identifier(start_identifier)
            .send()
            .await
            .map_err(|e| {
                AuditError::api("ListResourceRecordSets", aws_sdk_route53::Error::from(e))
            })?;

        let next_cursor = match (output.next_record_name, output.next_record_type) {
            (Some(name), Some(record_type)) => Some(RecordCursor {
                name,
                record_type: record_type.as_str().to_string(),
                identifier: output.next_record_identifier,
            }),
            _ => None,
        };

        Ok(RecordSetPage {
            record_sets: output
                .resource_record_sets
                .into_iter()
                .map(to_record_set)
                .collect(),
            truncated: output.is_truncated,
            next_cursor,
        })
    }
}
