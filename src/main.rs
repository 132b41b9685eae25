//! Route53 Audit
//!
//! Lists every public hosted zone in the account and prints a JSON snapshot
//! of the A, AAAA and CNAME records found in each. Progress goes to stderr.
//!
//! # Usage
//! ```bash
//! # Audit all public zones
//! route53-audit --profile prod > snapshot.json
//!
//! # Audit two zones, keep going past zones that fail
//! route53-audit --zone Z0123ABC --zone Z0456DEF --continue-on-error --pretty
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use route53_audit::provider::PAGE_SIZE;
use route53_audit::records::{RecordFilter, ACM_VALIDATION_SUFFIX};
use route53_audit::{AuditConfig, Auditor, RecordErrorPolicy, Route53Provider, ZoneId};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "route53-audit")]
#[command(about = "Snapshot auditable DNS records across public Route53 zones", long_about = None)]
#[command(version)]
struct Cli {
    /// AWS region for the Route53 client
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// AWS shared config profile
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Items requested per listing page
    #[arg(long, default_value_t = PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=300))]
    page_size: u32,

    /// Only collect records for these zone IDs (repeatable)
    #[arg(long = "zone", value_parser = parse_zone_id)]
    zones: Vec<ZoneId>,

    /// Record failed zones and continue instead of aborting
    #[arg(long)]
    continue_on_error: bool,

    /// Drop literal values ending with this suffix (certificate validation records)
    #[arg(long, default_value = ACM_VALIDATION_SUFFIX, env = "AUDIT_VALIDATION_SUFFIX")]
    validation_suffix: String,

    /// Per-request deadline in seconds
    #[arg(long, env = "AUDIT_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Write the snapshot to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON snapshot
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_zone_id(value: &str) -> Result<ZoneId, String> {
    ZoneId::parse(value).map_err(|e| e.to_string())
}

impl Cli {
    fn audit_config(&self) -> AuditConfig {
        AuditConfig {
            page_size: self.page_size,
            on_record_error: if self.continue_on_error {
                RecordErrorPolicy::Continue
            } else {
                RecordErrorPolicy::Abort
            },
            zones: self.zones.clone(),
            call_timeout: self.timeout_secs.map(Duration::from_secs),
            filter: RecordFilter {
                validation_suffix: self.validation_suffix.clone(),
            },
        }
    }
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    info!("Route53 audit starting");

    let provider = Route53Provider::from_env(cli.region.clone(), cli.profile.clone()).await;
    let auditor = Auditor::new(provider, cli.audit_config());

    let report = auditor.run().await.context("Audit failed")?;

    for failure in &report.failed_zones {
        warn!(zone = %failure.zone, error = %failure.error, "Zone not audited");
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report.snapshot)
    } else {
        serde_json::to_string(&report.snapshot)
    }
    .context("Failed to serialize snapshot")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
            info!(path = %path.display(), "Snapshot written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write snapshot to stdout")?;
        }
    }

    if !report.failed_zones.is_empty() {
        anyhow::bail!("{} zone(s) could not be audited", report.failed_zones.len());
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the snapshot
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}
