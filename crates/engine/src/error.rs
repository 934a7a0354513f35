//! The module contains the errors the engine can throw.
//!
//! The taxonomy follows how an error must be handled by the caller:
//!
//! - [`Validation`] is rejected input, caught before any write.
//! - [`LotAlreadySold`] and [`CodeGenerationFailed`] are semantic conflicts.
//! - [`StoreUnavailable`] / [`StoreWriteFailed`] are transient store failures;
//!   a failed read means "unknown", never "empty".
//!
//!  [`Validation`]: EngineError::Validation
//!  [`LotAlreadySold`]: EngineError::LotAlreadySold
//!  [`CodeGenerationFailed`]: EngineError::CodeGenerationFailed
//!  [`StoreUnavailable`]: EngineError::StoreUnavailable
//!  [`StoreWriteFailed`]: EngineError::StoreWriteFailed
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad or missing input; the caller can fix and resubmit.
    #[error("invalid input: {0}")]
    Validation(String),
    /// No authenticated principal; every mutating operation is refused.
    #[error("authentication required")]
    Unauthorized,
    #[error("\"{0}\" not found!")]
    NotFound(String),
    /// The lot already has a sale recorded against it.
    #[error("lot \"{0}\" already sold")]
    LotAlreadySold(String),
    /// The atomic lot-code allocation did not complete; no lot was created.
    #[error("failed to allocate a lot code for {0}")]
    CodeGenerationFailed(String),
    /// A read against the store failed.
    #[error("store read failed: {0}")]
    StoreUnavailable(DbErr),
    /// A write against the store failed. Safe to retry only for idempotent
    /// operations; `create_lot`/`record_sale` retries must first check whether
    /// the original attempt committed.
    #[error("store write failed: {0}")]
    StoreWriteFailed(DbErr),
    /// A row came back from the store in a shape the engine cannot trust.
    #[error("corrupt row in store: {0}")]
    Corrupted(String),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::LotAlreadySold(a), Self::LotAlreadySold(b)) => a == b,
            (Self::CodeGenerationFailed(a), Self::CodeGenerationFailed(b)) => a == b,
            (Self::StoreUnavailable(a), Self::StoreUnavailable(b)) => {
                a.to_string() == b.to_string()
            }
            (Self::StoreWriteFailed(a), Self::StoreWriteFailed(b)) => {
                a.to_string() == b.to_string()
            }
            (Self::Corrupted(a), Self::Corrupted(b)) => a == b,
            _ => false,
        }
    }
}
