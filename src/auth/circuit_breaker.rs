//! Circuit breaker guarding calls to an upstream dependency.
//!
//! Closed: calls pass, consecutive failures are counted.
//! Open: calls are rejected without running until `recovery_timeout` passes.
//! Half-open: a single trial call runs; success closes, failure re-opens.

use serde::Serialize;
use std::{
    future::Future,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
pub const DEFAULT_RECOVERY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker.
    pub failure_threshold: u32,
    /// How long the breaker stays open before letting a trial call through.
    pub recovery_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            recovery_timeout: DEFAULT_RECOVERY_TIMEOUT,
        }
    }
}

/// Externally visible breaker state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BreakerError<E> {
    /// The call was rejected without being attempted.
    Open,
    /// The call ran and failed.
    Inner(E),
}

#[derive(Clone, Copy, Debug)]
enum Circuit {
    Closed { failures: u32 },
    Open { until: Instant },
    HalfOpen { trial_started: Instant },
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    circuit: Mutex<Circuit>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config: BreakerConfig {
                failure_threshold: config.failure_threshold.max(1),
                ..config
            },
            circuit: Mutex::new(Circuit::Closed { failures: 0 }),
        }
    }

    pub fn config(&self) -> BreakerConfig {
        self.config
    }

    pub fn state(&self) -> BreakerState {
        match *self.lock() {
            Circuit::Closed { .. } => BreakerState::Closed,
            Circuit::Open { until } if Instant::now() < until => BreakerState::Open,
            Circuit::Open { .. } | Circuit::HalfOpen { .. } => BreakerState::HalfOpen,
        }
    }

    /// Run `call` unless the breaker is open.
    ///
    /// `is_failure` decides which errors count against the upstream; errors
    /// it rejects are passed through and treated as a healthy response.
    pub async fn call<T, E, F>(
        &self,
        is_failure: impl Fn(&E) -> bool,
        call: F,
    ) -> Result<T, BreakerError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        if !self.try_acquire() {
            return Err(BreakerError::Open);
        }

        match call.await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(err) => {
                if is_failure(&err) {
                    self.record_failure();
                } else {
                    self.record_success();
                }
                Err(BreakerError::Inner(err))
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Circuit> {
        // State stays consistent even if a holder panicked: every write is a
        // single assignment.
        self.circuit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn try_acquire(&self) -> bool {
        let mut circuit = self.lock();
        let now = Instant::now();
        let current = *circuit;
        match current {
            Circuit::Closed { .. } => true,
            Circuit::Open { until } if now >= until => {
                *circuit = Circuit::HalfOpen { trial_started: now };
                true
            }
            Circuit::Open { .. } => false,
            // A trial that never reported back (its caller went away) is
            // replaced once it has been pending for a full cooldown.
            Circuit::HalfOpen { trial_started }
                if now.duration_since(trial_started) >= self.config.recovery_timeout =>
            {
                *circuit = Circuit::HalfOpen { trial_started: now };
                true
            }
            Circuit::HalfOpen { .. } => false,
        }
    }

    fn record_success(&self) {
        let mut circuit = self.lock();
        if !matches!(*circuit, Circuit::Closed { .. }) {
            info!("circuit breaker closed");
        }
        *circuit = Circuit::Closed { failures: 0 };
    }

    fn record_failure(&self) {
        let mut circuit = self.lock();
        let open = Circuit::Open {
            until: Instant::now() + self.config.recovery_timeout,
        };
        let current = *circuit;
        match current {
            Circuit::Closed { failures } => {
                let failures = failures + 1;
                if failures >= self.config.failure_threshold {
                    warn!(
                        failures,
                        cooldown_secs = self.config.recovery_timeout.as_secs_f64(),
                        "circuit breaker opened"
                    );
                    *circuit = open;
                } else {
                    *circuit = Circuit::Closed { failures };
                }
            }
            Circuit::HalfOpen { .. } => {
                warn!("trial call failed, circuit breaker re-opened");
                *circuit = open;
            }
            Circuit::Open { .. } => {}
        }
    }
}
