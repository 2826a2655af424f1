//! # Bot Error Types Module
//!
//! This module defines the error kinds produced while answering chat commands.
//! None of them escape to the transport layer: the dispatcher turns every
//! variant into a user-visible reply.

/// Custom error types for command handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    /// No card or search match
    NotFound(String),
    /// Index selection outside the current result list
    OutOfRange { index: usize, len: usize },
    /// Network or parse failure from an external service
    ExternalService { service: String, message: String },
    /// External call exceeded the configured timeout
    Timeout { service: String },
    /// Circuit breaker is open for the service
    ServiceUnavailable { service: String },
}

impl BotError {
    pub fn external(service: &str, message: impl Into<String>) -> Self {
        BotError::ExternalService {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error should count against a service's circuit breaker
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            BotError::ExternalService { .. } | BotError::Timeout { .. }
        )
    }
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotError::NotFound(what) => write!(f, "Not found: {what}"),
            BotError::OutOfRange { index, len } => {
                write!(f, "Index {index} out of range for list of {len}")
            }
            BotError::ExternalService { service, message } => {
                write!(f, "External service error ({service}): {message}")
            }
            BotError::Timeout { service } => write!(f, "Timeout error: {service}"),
            BotError::ServiceUnavailable { service } => {
                write!(f, "Service unavailable: {service}")
            }
        }
    }
}

impl std::error::Error for BotError {}
