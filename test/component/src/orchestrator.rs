//! One complete harness run with guaranteed teardown.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use relaycheck_id::RunId;
use relaycheck_provision::Provisioner;
use tracing::{error, info, warn};

use crate::config::HarnessConfig;
use crate::driver::ProtocolDriver;
use crate::error::{HarnessError, Result};
use crate::lifecycle::{ResourceLedger, TeardownReport};
use crate::output::{Phase, Reporter};
use crate::topology::TopologyBuilder;

/// Result of one run.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    /// `Ok` only if every listener received an equal notification.
    pub outcome: Result<()>,
    pub teardown: TeardownReport,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Composes builder and driver into a single run.
pub struct Orchestrator {
    config: HarnessConfig,
    provisioner: Option<Arc<dyn Provisioner>>,
    reporter: Arc<dyn Reporter>,
}

impl Orchestrator {
    /// `provisioner` may be `None` only for remote endpoints.
    pub fn new(
        config: HarnessConfig,
        provisioner: Option<Arc<dyn Provisioner>>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config,
            provisioner,
            reporter,
        }
    }

    pub async fn run(&self) -> RunReport {
        self.run_until(std::future::pending()).await
    }

    /// Runs until done or until `shutdown` resolves, whichever comes first.
    ///
    /// Teardown runs exactly once on every path, including a panic inside
    /// the run and an abort through `shutdown`.
    pub async fn run_until<F>(&self, shutdown: F) -> RunReport
    where
        F: Future<Output = ()>,
    {
        let run_id = RunId::new();
        let mut ledger = ResourceLedger::new(run_id);
        info!(
            run_id = %run_id,
            remote = self.config.is_remote(),
            edges = self.config.edge_count,
            encoding = %self.config.encoding,
            "Starting run"
        );

        // Set once the builder has reported its own failure, before its teardown.
        let mut failure_reported = false;
        let outcome = {
            let execution =
                AssertUnwindSafe(self.execute(&mut ledger, &mut failure_reported)).catch_unwind();
            tokio::select! {
                result = execution => match result {
                    Ok(outcome) => outcome,
                    Err(panic) => Err(HarnessError::Fault(panic_message(panic))),
                },
                _ = shutdown => {
                    warn!(run_id = %run_id, "Run interrupted");
                    Err(HarnessError::Interrupted)
                }
            }
        };

        if let Err(e) = &outcome {
            error!(run_id = %run_id, error = %e, reason = e.reason_code(), "Run failed");
            if !failure_reported {
                self.reporter.failure(e);
            }
        }

        let teardown = ledger.teardown_all().await;
        self.reporter.teardown(&teardown);
        if !teardown.is_clean() {
            warn!(run_id = %run_id, failures = teardown.failures.len(), "Teardown left resources behind");
        }

        let passed = outcome.is_ok();
        info!(run_id = %run_id, passed, released = teardown.released.len(), "Run finished");
        self.reporter.verdict(passed);

        RunReport {
            run_id,
            outcome,
            teardown,
        }
    }

    async fn execute(&self, ledger: &mut ResourceLedger, failure_reported: &mut bool) -> Result<()> {
        self.config.validate()?;
        let notification = self.config.notification();
        let driver = ProtocolDriver::new(self.config.encoding, self.config.submit_timeout)?;

        let builder = TopologyBuilder::new(
            self.config.clone(),
            self.provisioner.clone(),
            Arc::clone(&self.reporter),
        );
        let topology = builder
            .build(ledger, &notification)
            .await
            .inspect_err(|_| *failure_reported = true)?;

        if !self.config.settle_delay.is_zero() {
            info!(delay = ?self.config.settle_delay, "Waiting for edges to subscribe upstream");
            tokio::time::sleep(self.config.settle_delay).await;
        }

        driver.submit(&topology.submit_endpoint, &notification).await?;
        self.reporter
            .phase(Phase::Submitted, topology.submit_endpoint.as_str());

        for listener in &topology.listeners {
            let received = driver
                .await_receipt(listener, self.config.receive_timeout)
                .await?;
            self.reporter.phase(Phase::Received, &received.canonical());

            ProtocolDriver::assert_equal(&notification, &received)?;
            self.reporter.phase(Phase::Compared, &listener.id().to_string());
        }
        Ok(())
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extracts_text() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("bang".to_string())), "bang");
        assert_eq!(panic_message(Box::new(7u8)), "unknown panic");
    }
}
