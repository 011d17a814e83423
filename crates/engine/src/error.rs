//! The module contains the errors the engine can throw.
//!
//! The interesting variants are the budget-specific ones:
//!
//! - [`InvalidRange`] thrown when a budget window is inverted.
//! - [`TenancyViolation`] thrown when a record references data of a
//!   different owner; report evaluation logs it and drops the record.
//!
//!  [`InvalidRange`]: EngineError::InvalidRange
//!  [`TenancyViolation`]: EngineError::TenancyViolation
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingName(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Tenancy violation: {0}")]
    TenancyViolation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ExistingName(a), Self::ExistingName(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidRange(a), Self::InvalidRange(b)) => a == b,
            (Self::TenancyViolation(a), Self::TenancyViolation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
