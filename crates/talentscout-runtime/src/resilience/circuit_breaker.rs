//! Circuit breaker to stop hammering a failing model.
//!
//! When calls to a collaborator fail repeatedly the circuit opens and later
//! calls fail fast until the recovery timeout has passed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::collaborators::CollaboratorKind;

/// Circuit breaker configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitBreakerConfig {
    /// Failures before opening circuit
    pub failure_threshold: u32,

    /// Time before attempting recovery, e.g. `"30s"`
    #[serde(with = "crate::config::duration_str")]
    pub recovery_timeout: Duration,

    /// Successes needed to close circuit
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 1,
        }
    }
}

/// State of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation
    Closed { failures: u32 },

    /// Circuit is open, calls fail fast
    Open { opened_at: Instant },

    /// Testing if circuit can close
    HalfOpen { successes: u32 },
}

/// One circuit per collaborator kind, so a broken translator does not stop
/// question answering.
pub struct CircuitBreaker {
    states: RwLock<HashMap<CollaboratorKind, CircuitState>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Returns true if calls to `kind` should fail fast.
    pub fn is_open(&self, kind: CollaboratorKind) -> bool {
        let states = self.states.read();
        match states.get(&kind) {
            Some(CircuitState::Open { opened_at }) => {
                if opened_at.elapsed() >= self.config.recovery_timeout {
                    drop(states);
                    self.transition_to_half_open(kind);
                    false
                } else {
                    true
                }
            }
            _ => false,
        }
    }

    pub fn record_success(&self, kind: CollaboratorKind) {
        let mut states = self.states.write();
        match states.get(&kind).cloned() {
            Some(CircuitState::HalfOpen { successes }) => {
                if successes + 1 >= self.config.success_threshold {
                    states.insert(kind, CircuitState::Closed { failures: 0 });
                    tracing::info!(collaborator = %kind, "Circuit closed after successful recovery");
                } else {
                    states.insert(
                        kind,
                        CircuitState::HalfOpen {
                            successes: successes + 1,
                        },
                    );
                }
            }
            Some(CircuitState::Closed { .. }) => {
                states.insert(kind, CircuitState::Closed { failures: 0 });
            }
            _ => {}
        }
    }

    pub fn record_failure(&self, kind: CollaboratorKind) {
        let mut states = self.states.write();
        let current = states
            .get(&kind)
            .cloned()
            .unwrap_or(CircuitState::Closed { failures: 0 });

        match current {
            CircuitState::Closed { failures } => {
                if failures + 1 >= self.config.failure_threshold {
                    states.insert(
                        kind,
                        CircuitState::Open {
                            opened_at: Instant::now(),
                        },
                    );
                    tracing::warn!(
                        collaborator = %kind,
                        failures = failures + 1,
                        "Circuit opened after repeated failures"
                    );
                } else {
                    states.insert(
                        kind,
                        CircuitState::Closed {
                            failures: failures + 1,
                        },
                    );
                }
            }
            CircuitState::HalfOpen { .. } => {
                states.insert(
                    kind,
                    CircuitState::Open {
                        opened_at: Instant::now(),
                    },
                );
                tracing::warn!(collaborator = %kind, "Circuit reopened after failed recovery attempt");
            }
            CircuitState::Open { .. } => {}
        }
    }

    fn transition_to_half_open(&self, kind: CollaboratorKind) {
        let mut states = self.states.write();
        if matches!(states.get(&kind), Some(CircuitState::Open { .. })) {
            states.insert(kind, CircuitState::HalfOpen { successes: 0 });
            tracing::info!(collaborator = %kind, "Circuit half-open, allowing a trial call");
        }
    }

    pub fn state(&self, kind: CollaboratorKind) -> CircuitState {
        self.states
            .read()
            .get(&kind)
            .cloned()
            .unwrap_or(CircuitState::Closed { failures: 0 })
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
