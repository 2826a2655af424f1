//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for calls to external
//! card services. When a service fails repeatedly, further requests fail fast
//! instead of stalling every chat on the same dead endpoint.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::ServiceConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

/// Circuit breaker for one external service
///
/// # State Machine
///
/// - **Closed**: Normal operation, requests pass through
/// - **Open**: Failure threshold exceeded, requests fail fast
/// - **Half-Open**: Reset timeout elapsed, the next request is let through
///
/// # Configuration
///
/// Uses `ServiceConfig` for:
/// - `circuit_breaker_threshold`: Failures before opening (default: 5)
/// - `circuit_breaker_reset_secs`: Time before attempting reset (default: 60s)
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    threshold: u32,
    reset_after: Duration,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cardbot::config::ServiceConfig;
    /// use cardbot::circuit_breaker::CircuitBreaker;
    ///
    /// let circuit_breaker = CircuitBreaker::new(&ServiceConfig::default());
    /// assert!(!circuit_breaker.is_open());
    /// ```
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            threshold: config.circuit_breaker_threshold,
            reset_after: Duration::from_secs(config.circuit_breaker_reset_secs),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check if circuit breaker is open (blocking requests)
    ///
    /// Automatically moves back to closed once the reset timeout has elapsed.
    pub fn is_open(&self) -> bool {
        let mut state = self.lock();

        if state.failure_count >= self.threshold {
            if let Some(last_time) = state.last_failure_time {
                if last_time.elapsed() < self.reset_after {
                    return true;
                }
                *state = BreakerState::default();
            }
        }
        false
    }

    /// Record a failed call
    pub fn record_failure(&self) {
        let mut state = self.lock();
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
    }

    /// Record a successful call, closing the circuit
    pub fn record_success(&self) {
        *self.lock() = BreakerState::default();
    }

    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }
}
