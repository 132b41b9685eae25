//! Record Collection
//!
//! Pages through one zone's record sets, keeps the A / AAAA / CNAME records
//! worth auditing and writes them into the [`Snapshot`].

use tracing::{debug, info};

use crate::error::{AuditError, Result};
use crate::provider::{DnsProvider, RecordCursor, RecordSet};
use crate::types::{strip_root, DnsRecord, RecordType, Snapshot, ZoneId};

/// Suffix of the CNAME targets ACM creates for DNS domain validation
pub const ACM_VALIDATION_SUFFIX: &str = "acm-validations.aws.";

/// Turns provider record sets into auditable records
#[derive(Debug, Clone)]
pub struct RecordFilter {
    /// Literal values ending with this suffix are validation placeholders.
    /// Matched case-insensitively.
    pub validation_suffix: String,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            validation_suffix: ACM_VALIDATION_SUFFIX.to_string(),
        }
    }
}

impl RecordFilter {
    /// Audit a single record set.
    ///
    /// Returns `None` for unsupported types and for literal record sets whose
    /// values were all validation placeholders.
    pub fn audit(&self, set: &RecordSet) -> Option<DnsRecord> {
        let name = strip_root(&set.name);

        let Some(record_type) = RecordType::from_provider(&set.record_type) else {
            info!(record = %name, record_type = %set.record_type, "Skipping unsupported record type");
            return None;
        };

        if let Some(target) = &set.alias_target {
            return Some(DnsRecord::alias(&set.name, record_type, target));
        }

        let suffix = self.validation_suffix.to_ascii_lowercase();
        let mut values = Vec::with_capacity(set.values.len());
        for value in &set.values {
            if value.to_ascii_lowercase().ends_with(&suffix) {
                info!(record = %name, "Skipping validation placeholder (ACM)");
                continue;
            }
            values.push(strip_root(value).to_string());
        }

        DnsRecord::literal(&set.name, record_type, values)
    }
}

/// Collect a zone's auditable records into `snapshot`.
///
/// The zone's entry is replaced after every page, so it always holds the
/// records seen so far; after the last page it is complete. A zone with
/// nothing to audit still gets an empty entry.
pub async fn collect_records<P>(
    provider: &P,
    zone: &ZoneId,
    page_size: u32,
    filter: &RecordFilter,
    snapshot: &mut Snapshot,
) -> Result<()>
where
    P: DnsProvider + ?Sized,
{
    info!(zone = %zone, "Processing zone");

    let mut records: Vec<DnsRecord> = Vec::new();
    let mut cursor: Option<RecordCursor> = None;

    loop {
        let page = provider
            .list_record_sets(zone, page_size, cursor.take())
            .await?;
        debug!(
            zone = %zone,
            record_sets = page.record_sets.len(),
            truncated = page.truncated,
            "Fetched record set page"
        );

        records.extend(page.record_sets.iter().filter_map(|set| filter.audit(set)));
        snapshot.replace(zone, records.clone());

        if !page.truncated {
            debug!(zone = %zone, records = records.len(), "Zone complete");
            return Ok(());
        }

        cursor = Some(
            page.next_cursor
                .ok_or(AuditError::MissingContinuation("ListResourceRecordSets"))?,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::stub::{alias, cursor, literal, RecordRequest, StubProvider};
    use crate::provider::{RecordSetPage, PAGE_SIZE};
    use tokio_test::{assert_err, assert_ok};

    fn zone_id(id: &str) -> ZoneId {
        ZoneId::new(id).unwrap()
    }

    #[test]
    fn test_unsupported_types_dropped() {
        let filter = RecordFilter::default();
        for record_type in ["MX", "TXT", "NS", "SOA", "SRV", "CAA", "PTR"] {
            let set = literal("example.com.", record_type, &["10 mail.example.com."]);
            assert_eq!(filter.audit(&set), None, "{record_type}");
        }
    }

    #[test]
    fn test_literal_values_normalized_in_order() {
        let filter = RecordFilter::default();
        let set = literal("api.example.com.", "CNAME", &["lb-2.example.net.", "lb-1.example.net"]);

        let rec = filter.audit(&set).unwrap();
        assert_eq!(rec.name, "api.example.com");
        assert_eq!(rec.record_type, RecordType::CNAME);
        assert!(!rec.alias);
        assert_eq!(rec.values, vec!["lb-2.example.net", "lb-1.example.net"]);
    }

    #[test]
    fn test_validation_values_filtered_per_value() {
        let filter = RecordFilter::default();
        let set = literal(
            "mixed.example.com.",
            "CNAME",
            &["_x1.acm-validations.aws.", "real.example.net."],
        );

        let rec = filter.audit(&set).unwrap();
        assert_eq!(rec.values, vec!["real.example.net"]);
    }

    #[test]
    fn test_validation_only_record_dropped() {
        let filter = RecordFilter::default();
        let set = literal(
            "_abc.example.com.",
            "CNAME",
            &["_def.xyz.acm-validations.aws."],
        );
        assert_eq!(filter.audit(&set), None);
    }

    #[test]
    fn test_validation_suffix_ignores_case() {
        let filter = RecordFilter::default();
        let set = literal(
            "_abc.example.com.",
            "CNAME",
            &["_X1.ACM-VALIDATIONS.AWS.", "Real.Example.NET."],
        );

        let rec = filter.audit(&set).unwrap();
        assert_eq!(rec.values, vec!["Real.Example.NET"]);
    }

    #[test]
    fn test_alias_record_single_value() {
        let filter = RecordFilter::default();
        let set = alias(
            "example.com.",
            "A",
            "d111111abcdef8.cloudfront.net.",
        );

        let rec = filter.audit(&set).unwrap();
        assert!(rec.alias);
        assert_eq!(rec.values, vec!["d111111abcdef8.cloudfront.net"]);
    }

    #[test]
    fn test_alias_target_not_subject_to_value_filter() {
        let filter = RecordFilter::default();
        let set = alias("weird.example.com.", "CNAME", "x.acm-validations.aws.");

        let rec = filter.audit(&set).unwrap();
        assert_eq!(rec.values, vec!["x.acm-validations.aws"]);
    }

    #[test]
    fn test_custom_validation_suffix() {
        let filter = RecordFilter {
            validation_suffix: ".dv.example-ca.net.".to_string(),
        };
        let set = literal("_dv.example.com.", "CNAME", &["token.dv.example-ca.net."]);
        assert_eq!(filter.audit(&set), None);
    }

    #[tokio::test]
    async fn test_collect_single_page() {
        let provider = StubProvider::new().with_record_page(
            "Z1",
            RecordSetPage {
                record_sets: vec![
                    literal("example.com.", "NS", &["ns-1.awsdns-00.com."]),
                    literal("www.example.com.", "A", &["192.0.2.1", "192.0.2.2"]),
                    alias("example.com.", "AAAA", "lb.example.net."),
                ],
                truncated: false,
                next_cursor: None,
            },
        );

        let mut snapshot = Snapshot::new();
        let zone = zone_id("Z1");
        assert_ok!(
            collect_records(&provider, &zone, PAGE_SIZE, &RecordFilter::default(), &mut snapshot)
                .await
        );

        let records = snapshot.get(&zone).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "www.example.com");
        assert_eq!(records[1].record_type, RecordType::AAAA);
        assert!(records[1].alias);
    }

    #[tokio::test]
    async fn test_collect_pages_with_compound_cursor() {
        let provider = StubProvider::new()
            .with_record_page(
                "Z1",
                RecordSetPage {
                    record_sets: vec![literal("a.example.com.", "A", &["192.0.2.1"])],
                    truncated: true,
                    next_cursor: Some(cursor("b.example.com.", "CNAME")),
                },
            )
            .with_record_page(
                "Z1",
                RecordSetPage {
                    record_sets: vec![literal("b.example.com.", "CNAME", &["a.example.com."])],
                    truncated: true,
                    next_cursor: Some(RecordCursor {
                        name: "c.example.com.".to_string(),
                        record_type: "A".to_string(),
                        identifier: Some("us-east-1".to_string()),
                    }),
                },
            )
            .with_record_page(
                "Z1",
                RecordSetPage {
                    record_sets: vec![literal("c.example.com.", "A", &["192.0.2.3"])],
                    truncated: false,
                    next_cursor: None,
                },
            );

        let zone = zone_id("Z1");
        let mut snapshot = Snapshot::new();
        assert_ok!(
            collect_records(&provider, &zone, PAGE_SIZE, &RecordFilter::default(), &mut snapshot)
                .await
        );

        let names: Vec<&str> = snapshot
            .get(&zone)
            .unwrap()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["a.example.com", "b.example.com", "c.example.com"]);

        let requests = provider.record_requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0],
            RecordRequest {
                zone: zone.clone(),
                page_size: PAGE_SIZE,
                cursor: None
            }
        );
        assert_eq!(requests[1].cursor, Some(cursor("b.example.com.", "CNAME")));
        assert_eq!(
            requests[2].cursor.as_ref().and_then(|c| c.identifier.as_deref()),
            Some("us-east-1")
        );
    }

    #[tokio::test]
    async fn test_empty_zone_gets_empty_entry() {
        let provider = StubProvider::new().with_record_page(
            "Z1",
            RecordSetPage {
                record_sets: vec![
                    literal("example.com.", "SOA", &["ns-1.awsdns-00.com. 1 7200 900 1209600 86400"]),
                    literal("_v.example.com.", "CNAME", &["_t.acm-validations.aws."]),
                ],
                truncated: false,
                next_cursor: None,
            },
        );

        let zone = zone_id("Z1");
        let mut snapshot = Snapshot::new();
        assert_ok!(
            collect_records(&provider, &zone, PAGE_SIZE, &RecordFilter::default(), &mut snapshot)
                .await
        );

        assert!(snapshot.contains(&zone));
        assert!(snapshot.get(&zone).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_leaves_last_complete_page() {
        let provider = StubProvider::new()
            .with_record_page(
                "Z1",
                RecordSetPage {
                    record_sets: vec![literal("a.example.com.", "A", &["192.0.2.1"])],
                    truncated: true,
                    next_cursor: Some(cursor("b.example.com.", "A")),
                },
            )
            .with_record_error("Z1", "access denied");

        let zone = zone_id("Z1");
        let mut snapshot = Snapshot::new();
        let err = assert_err!(
            collect_records(&provider, &zone, PAGE_SIZE, &RecordFilter::default(), &mut snapshot)
                .await
        );

        assert!(matches!(err, AuditError::Api { operation: "ListResourceRecordSets", .. }));
        assert_eq!(snapshot.get(&zone).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_truncated_page_without_cursor_is_an_error() {
        let provider = StubProvider::new().with_record_page(
            "Z1",
            RecordSetPage {
                record_sets: Vec::new(),
                truncated: true,
                next_cursor: None,
            },
        );

        let mut snapshot = Snapshot::new();
        let err = assert_err!(
            collect_records(
                &provider,
                &zone_id("Z1"),
                PAGE_SIZE,
                &RecordFilter::default(),
                &mut snapshot
            )
            .await
        );
        assert!(matches!(err, AuditError::MissingContinuation(_)));
    }
}
