//! batchdns: bulk hostname resolution.
//!
//! Reads hostname lists from one or more input files, resolves them on a
//! pool of worker threads, and appends one `host,addr1,addr2,...` record per
//! hostname to the output file. Failed lookups are recorded with a sentinel
//! marker instead of an address list.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use batchdns_pipeline::{Pipeline, PipelineConfig};
use batchdns_resolve::DnsResolver;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Resolve hostname lists to addresses in parallel.
#[derive(Parser)]
#[command(
    name = "batchdns",
    version,
    about = "Resolve hostname lists to addresses in parallel",
    long_about = "Reads hostnames (one token per line) from every input file, resolves them \
                  concurrently, and appends one comma-separated record per hostname to the \
                  output file."
)]
struct Cli {
    /// Input files, one hostname per line
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file; records are appended
    #[arg(short, long)]
    output: PathBuf,

    /// Resolver worker threads (default: one per available processing unit)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Capacity of the pending-hostname queue
    #[arg(short = 'q', long, default_value_t = batchdns_pipeline::DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Maximum addresses recorded per hostname
    #[arg(long, default_value_t = batchdns_pipeline::DEFAULT_MAX_ADDRESSES)]
    max_addrs: usize,

    /// Marker written when a lookup fails or returns no addresses
    #[arg(long, default_value = batchdns_pipeline::DEFAULT_SENTINEL)]
    sentinel: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::new(cli.inputs, cli.output);
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    config.queue_capacity = cli.queue_capacity;
    config.max_addresses = cli.max_addrs;
    config.sentinel = cli.sentinel;

    let resolver =
        Arc::new(DnsResolver::from_system().context("failed to initialize DNS resolver")?);

    let summary = Pipeline::new(config, resolver)
        .run()
        .context("pipeline failed")?;

    info!(
        hostnames = summary.hostnames_read,
        records = summary.records_written,
        failed_lookups = summary.failed_lookups,
        "done"
    );
    if summary.sources_failed > 0 {
        warn!(sources = summary.sources_failed, "some input files could not be opened");
    }
    if summary.rejected_tokens > 0 {
        warn!(tokens = summary.rejected_tokens, "some tokens exceeded the hostname length bound");
    }
    if summary.write_errors > 0 {
        warn!(records = summary.write_errors, "some records were lost to output write errors");
    }

    Ok(())
}
