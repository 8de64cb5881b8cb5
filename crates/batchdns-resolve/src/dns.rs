//! Blocking DNS resolver backed by hickory-resolver.
//!
//! The pipeline's workers are plain blocking threads, so this wraps the
//! Tokio resolver with an owned runtime and drives each lookup with
//! `block_on`. A multi-thread runtime lets lookups from different workers
//! proceed concurrently (hickory's own synchronous `Resolver` funnels every
//! call through one runtime mutex, which would serialize the whole pool).

use std::net::IpAddr;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::{Resolve, ResolveError};

/// System DNS resolver.
///
/// Prefers the host's resolver configuration (`/etc/resolv.conf` and
/// friends); falls back to the crate's default public configuration when the
/// system configuration cannot be read. Safe to share across worker threads;
/// each `resolve` call blocks its calling thread independently.
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    runtime: Runtime,
}

impl DnsResolver {
    /// Create a resolver from the system configuration, falling back to
    /// defaults.
    pub fn from_system() -> Result<Self, ResolveError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| ResolveError::Init(e.to_string()))?;

        // Constructed inside the runtime so the resolver binds to it.
        let resolver = runtime.block_on(async {
            match TokioAsyncResolver::tokio_from_system_conf() {
                Ok(resolver) => {
                    info!("DNS resolver initialized from system configuration");
                    resolver
                }
                Err(e) => {
                    warn!("system DNS configuration unavailable ({e}), using defaults");
                    TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
                }
            }
        });

        Ok(Self { resolver, runtime })
    }
}

impl Resolve for DnsResolver {
    fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>, ResolveError> {
        if hostname.is_empty() {
            return Err(ResolveError::InvalidName(hostname.to_string()));
        }

        let lookup = self
            .runtime
            .block_on(self.resolver.lookup_ip(hostname))
            .map_err(|e| ResolveError::Lookup(e.to_string()))?;

        let addresses: Vec<IpAddr> = lookup.iter().collect();
        debug!(hostname, count = addresses.len(), "lookup completed");
        Ok(addresses)
    }
}
