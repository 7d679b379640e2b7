//! The load driver.
//!
//! A [`Driver`] issues a fixed number of sequential calls against a [`Target`]
//! and measures the wall-clock time of the whole batch. Individual responses
//! are discarded; only failures are counted.

use crate::infra::error::{BenchError, CallError};
use async_trait::async_trait;
use serde::Deserialize;
use std::{fmt, time::Duration};
use tokio::time::Instant;

pub mod grpc_target;
pub mod http_target;

/// Something the driver can call.
#[async_trait]
pub trait Target: Send {
    /// Performs one round trip, discarding the response.
    async fn call(&mut self) -> Result<(), CallError>;
}

/// What the driver does when a call fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the batch and fail the run.
    Abort,
    /// Log the failure, count it and move on to the next call.
    #[default]
    Skip,
    /// Re-issue the call up to `attempts` more times, then skip it.
    Retry {
        /// Additional attempts after the first failure.
        attempts: u32,
    },
}

/// The outcome of one timed batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkResult {
    label: String,
    calls: usize,
    failed: usize,
    elapsed: Duration,
}

impl BenchmarkResult {
    /// What was measured, e.g. `Http GET`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of calls issued.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Number of calls that failed after any retries.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Time between just before the first call and just after the last.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Calls per second, or zero for an empty or instantaneous batch.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.calls as f64 / secs
        } else {
            0.0
        }
    }

    /// Reports the result through the process logger.
    pub fn log(&self) {
        tracing::info!(
            duration = ?self.elapsed,
            failed = self.failed,
            calls_per_sec = self.throughput().round() as u64,
            "{} time taken for {} calls",
            self.label,
            self.calls,
        );
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} calls in {:?} ({:.0} calls/s, {} failed)",
            self.label,
            self.calls,
            self.elapsed,
            self.throughput(),
            self.failed
        )
    }
}

/// Issues a fixed batch of sequential calls.
#[derive(Clone, Debug)]
pub struct Driver {
    label: String,
    requests: usize,
    policy: FailurePolicy,
}

impl Driver {
    /// Constructs a new [`Driver`].
    pub fn new(label: impl Into<String>, requests: usize, policy: FailurePolicy) -> Self {
        Self {
            label: label.into(),
            requests,
            policy,
        }
    }

    /// Runs the batch against `target`.
    ///
    /// Fails only when the policy is [`FailurePolicy::Abort`] and a call fails.
    #[tracing::instrument(skip_all, fields(label = %self.label, requests = self.requests))]
    pub async fn run<T: Target>(&self, target: &mut T) -> Result<BenchmarkResult, BenchError> {
        let mut failed = 0;
        let start = Instant::now();
        for index in 0..self.requests {
            if let Err(source) = self.call_once(target).await {
                if self.policy == FailurePolicy::Abort {
                    return Err(BenchError::Aborted { index, source });
                }
                tracing::warn!(index, "something went wrong: {}", source);
                failed += 1;
            }
        }
        let elapsed = start.elapsed();
        Ok(BenchmarkResult {
            label: self.label.clone(),
            calls: self.requests,
            failed,
            elapsed,
        })
    }

    async fn call_once<T: Target>(&self, target: &mut T) -> Result<(), CallError> {
        let retries = match self.policy {
            FailurePolicy::Retry { attempts } => attempts,
            _ => 0,
        };
        let mut attempt = 0;
        loop {
            match target.call().await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < retries => {
                    attempt += 1;
                    tracing::debug!(attempt, "retrying failed call: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
