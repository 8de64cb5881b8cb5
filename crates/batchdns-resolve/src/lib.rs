//! Name resolution collaborator for the batchdns pipeline.
//!
//! The pipeline treats resolution as an opaque, possibly slow, blocking call.
//! This crate owns that seam: the [`Resolve`] trait, the errors it can
//! surface, and the real DNS-backed implementation.

use std::net::IpAddr;

use thiserror::Error;

mod dns;

pub use dns::DnsResolver;

/// Resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid hostname: {0:?}")]
    InvalidName(String),

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("resolver initialization failed: {0}")]
    Init(String),
}

/// A blocking hostname-to-address resolver.
///
/// Implementations may block on external I/O for an arbitrary time. The
/// pipeline calls `resolve` from many worker threads concurrently and holds
/// no locks across the call, so implementations must be `Send + Sync` but
/// are free to block independently per call.
pub trait Resolve: Send + Sync {
    /// Resolve a hostname to zero or more addresses, in answer order.
    fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>, ResolveError>;
}
