//! The probe service: validation, dispatch, bounded connection testing,
//! and best-effort database enumeration.
//!
//! A probe moves through fixed stages. Validation runs first and performs
//! no I/O; a request that fails it never reaches an adapter. Dispatch
//! resolves the adapter for the kind. The connection test runs under the
//! configured time budget and its failure fails the probe. Enumeration
//! runs under the same budget but is non-fatal: a failure or timeout
//! there degrades the result to an empty database list.
//!
//! Probes are stateless with respect to each other, so probing the same
//! target twice yields the same outcome modulo server-side changes.

use std::time::Duration;

use tracing::{debug, warn};

use crate::adapters::{DatabaseProber, prober_for};
use crate::descriptor::{ConnectionDescriptor, ProbeRequest};
use crate::error::ProbeError;
use crate::outcome::ProbeOutcome;

/// Time budget applied to the connection test and, separately, to
/// enumeration.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Stateless service that runs probes. Cheap to construct and `Clone`.
#[derive(Debug, Clone)]
pub struct ProbeService {
    connect_timeout: Duration,
}

impl ProbeService {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_timeout(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Runs one probe to completion. Never returns an error: every
    /// failure mode is folded into the outcome.
    pub async fn probe(&self, request: &ProbeRequest) -> ProbeOutcome {
        let descriptor = match ConnectionDescriptor::from_request(request) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                debug!(kind = %request.kind, error = %e, "probe request rejected");
                return ProbeOutcome::failure(&e);
            }
        };

        let prober = prober_for(descriptor.kind, self.connect_timeout);
        self.run(&descriptor, prober.as_ref()).await
    }

    /// Drives a resolved adapter through the connection test and
    /// enumeration stages.
    pub(crate) async fn run(
        &self,
        descriptor: &ConnectionDescriptor,
        prober: &dyn DatabaseProber,
    ) -> ProbeOutcome {
        let kind = descriptor.kind;

        let report = match tokio::time::timeout(
            self.connect_timeout,
            prober.test_connection(descriptor),
        )
        .await
        {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                debug!(kind = %kind, error = %e, "connection test failed");
                return ProbeOutcome::failure(&e);
            }
            Err(_) => {
                let e = ProbeError::Timeout(self.connect_timeout);
                debug!(kind = %kind, "connection test timed out");
                return ProbeOutcome::failure(&e);
            }
        };

        // Enumeration is best-effort: a reachable server with an
        // unenumerable catalog is still a successful probe.
        let databases = match tokio::time::timeout(
            self.connect_timeout,
            prober.list_databases(descriptor),
        )
        .await
        {
            Ok(Ok(databases)) => databases,
            Ok(Err(e)) => {
                warn!(kind = %kind, error = %e, "database enumeration failed");
                Vec::new()
            }
            Err(_) => {
                warn!(kind = %kind, "database enumeration timed out");
                Vec::new()
            }
        };

        debug!(kind = %kind, databases = databases.len(), "probe succeeded");
        ProbeOutcome::from_report(report, databases)
    }
}

impl Default for ProbeService {
    fn default() -> Self {
        Self::new()
    }
}
