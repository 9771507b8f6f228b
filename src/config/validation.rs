//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.chain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new("chain.rpc_url", format!("invalid URL: {}", e)));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "chain.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("chain.poll_interval_ms", "must be greater than 0"));
    }

    if config.ledger.contract_address.is_empty() {
        errors.push(ValidationError::new("ledger.contract_address", "is required"));
    } else if config.ledger.contract_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "ledger.contract_address",
            format!("'{}' is not an address", config.ledger.contract_address),
        ));
    }
    if config.ledger.read_function.is_empty() {
        errors.push(ValidationError::new("ledger.read_function", "is required"));
    }
    if config.ledger.write_function.is_empty() {
        errors.push(ValidationError::new("ledger.write_function", "is required"));
    }
    if config.ledger.gas_limit == 0 {
        errors.push(ValidationError::new("ledger.gas_limit", "must be greater than 0"));
    }

    if config.session.message_limit == 0 {
        errors.push(ValidationError::new("session.message_limit", "must be greater than 0"));
    }
    if config.session.error_display_ms == 0 {
        errors.push(ValidationError::new("session.error_display_ms", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
