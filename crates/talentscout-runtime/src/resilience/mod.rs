//! Resilience patterns for collaborator calls.
//!
//! - Circuit breaker per collaborator kind
//! - Retry with exponential backoff
//! - Fallback when outbound translation fails

mod circuit_breaker;
mod fallback;
mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use fallback::FallbackStrategy;
pub use retry::RetryPolicy;
