//! Route53 Audit Library
//!
//! Enumerates public hosted zones and snapshots their auditable
//! A / AAAA / CNAME records, skipping ACM validation placeholders.

pub mod audit;
pub mod error;
pub mod provider;
pub mod records;
pub mod route53;
pub mod types;
pub mod zones;

pub use audit::{AuditConfig, AuditReport, Auditor, RecordErrorPolicy};
pub use error::AuditError;
pub use provider::DnsProvider;
pub use route53::Route53Provider;
pub use types::{DnsRecord, RecordType, Snapshot, ZoneId};
