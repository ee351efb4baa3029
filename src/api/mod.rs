//! REST API module.
//!
//! Successful responses carry the bare resource, which is what the mobile client reads. Failures
//! use the [`crate::errors::ErrorResponse`] envelope.

mod admin;
mod shelters;

pub use admin::*;
pub use shelters::*;

use serde::Serialize;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, crate::errors::AppError>;

/// Acknowledgement returned by state transitions that have no resource to return.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub id: String,
}

impl Ack {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: id.into(),
        }
    }
}
