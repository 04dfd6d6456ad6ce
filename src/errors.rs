// Copyright 2025 Cowboy AI, LLC.

//! Error types for domain operations

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Input rejected by an aggregate or entity constructor
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A lookup matched nothing
    #[error("Not found: {entity_type} matching {criteria}")]
    NotFound {
        /// Type of entity that was searched for
        entity_type: String,
        /// Human readable description of the search criteria
        criteria: String,
    },

    /// A single-result lookup matched more than one record
    #[error("Integrity error: {specification} matched {matches} {entity_type} records, expected at most one")]
    IntegrityError {
        /// Type of entity that was searched for
        entity_type: String,
        /// Name of the specification that was evaluated
        specification: String,
        /// Number of records that matched
        matches: usize,
    },

    /// A natural key is already taken in the store
    #[error("Already exists: {entity_type} with key {key}")]
    AlreadyExists {
        /// Type of entity being stored
        entity_type: String,
        /// The conflicting key
        key: String,
    },

    /// Concurrency conflict
    #[error("Concurrency conflict: expected version {expected}, but found {actual}")]
    ConcurrencyConflict {
        /// Expected version
        expected: u64,
        /// Actual version
        actual: u64,
    },

    /// An event handler failed while events were being dispatched
    #[error("Delivery error: handler {handler} failed on {event_kind}: {message}")]
    DeliveryError {
        /// Name of the failing handler
        handler: String,
        /// Kind of the event being delivered
        event_kind: String,
        /// Message reported by the handler
        message: String,
        /// Number of events fully delivered before the failure
        delivered: usize,
    },

    /// An event handler exceeded the dispatch timeout
    #[error("Dispatch timeout: handler {handler} exceeded {timeout_ms}ms on {event_kind}")]
    DispatchTimeout {
        /// Name of the slow handler
        handler: String,
        /// Kind of the event being delivered
        event_kind: String,
        /// Timeout that was applied
        timeout_ms: u64,
        /// Number of events fully delivered before the timeout
        delivered: usize,
    },

    /// Dispatch was cancelled by the caller
    #[error("Dispatch cancelled after {delivered} delivered events")]
    DispatchCancelled {
        /// Number of events fully delivered before cancellation
        delivered: usize,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, criteria: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity_type: entity_type.into(),
            criteria: criteria.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::ValidationError(msg.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, DomainError::ValidationError(_))
    }

    /// Check if this is an integrity error
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, DomainError::IntegrityError { .. })
    }

    /// Check if this error came out of event dispatch
    pub fn is_delivery_error(&self) -> bool {
        matches!(
            self,
            DomainError::DeliveryError { .. }
                | DomainError::DispatchTimeout { .. }
                | DomainError::DispatchCancelled { .. }
        )
    }

    /// Check if this is a concurrency error
    pub fn is_concurrency_error(&self) -> bool {
        matches!(self, DomainError::ConcurrencyConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = DomainError::validation("Company name must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation error: Company name must not be empty"
        );

        let err = DomainError::not_found("Company", "name = Acme");
        assert_eq!(err.to_string(), "Not found: Company matching name = Acme");

        let err = DomainError::IntegrityError {
            entity_type: "Company".to_string(),
            specification: "CompanyByName".to_string(),
            matches: 2,
        };
        assert_eq!(
            err.to_string(),
            "Integrity error: CompanyByName matched 2 Company records, expected at most one"
        );

        let err = DomainError::AlreadyExists {
            entity_type: "Tag".to_string(),
            key: "fintech".to_string(),
        };
        assert_eq!(err.to_string(), "Already exists: Tag with key fintech");

        let err = DomainError::ConcurrencyConflict {
            expected: 5,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Concurrency conflict: expected version 5, but found 3"
        );

        let err = DomainError::DeliveryError {
            handler: "cache".to_string(),
            event_kind: "TagRemoved".to_string(),
            message: "boom".to_string(),
            delivered: 1,
        };
        assert_eq!(
            err.to_string(),
            "Delivery error: handler cache failed on TagRemoved: boom"
        );

        let err = DomainError::DispatchTimeout {
            handler: "bus".to_string(),
            event_kind: "TagAdded".to_string(),
            timeout_ms: 250,
            delivered: 0,
        };
        assert_eq!(
            err.to_string(),
            "Dispatch timeout: handler bus exceeded 250ms on TagAdded"
        );

        let err = DomainError::DispatchCancelled { delivered: 3 };
        assert_eq!(err.to_string(), "Dispatch cancelled after 3 delivered events");
    }

    #[test]
    fn test_classification_helpers_are_exclusive() {
        let integrity = DomainError::IntegrityError {
            entity_type: "Company".to_string(),
            specification: "CompanyByName".to_string(),
            matches: 2,
        };
        assert!(integrity.is_integrity_error());
        assert!(!integrity.is_not_found());
        assert!(!integrity.is_validation_error());

        let not_found = DomainError::not_found("Company", "name = x");
        assert!(not_found.is_not_found());
        assert!(!not_found.is_integrity_error());

        let conflict = DomainError::ConcurrencyConflict {
            expected: 1,
            actual: 2,
        };
        assert!(conflict.is_concurrency_error());
        assert!(!conflict.is_delivery_error());

        assert!(DomainError::DispatchCancelled { delivered: 0 }.is_delivery_error());
        assert!(DomainError::validation("x").is_validation_error());
    }

    #[test]
    fn test_serde_json_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let domain_err: DomainError = serde_err.into();

        match domain_err {
            DomainError::SerializationError(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected SerializationError, got {other:?}"),
        }
    }
}
