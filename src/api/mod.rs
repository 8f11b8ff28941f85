//! HTTP API module for the manday engine.
//!
//! This module provides the REST endpoint that reconciles progress and leave
//! rows posted as JSON.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PublicHolidayRequest, RawRowInput, ReconcileRequest, ValidatedRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
