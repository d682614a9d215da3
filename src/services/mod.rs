//! Service layer for business logic
//!
//! Shared between the HTTP API and tests: meetup CRUD with validation,
//! and business-profile management.

mod business_service;
mod meetup_service;

pub use business_service::*;
pub use meetup_service::*;
