// Public entities for the CarePortal API
// This module contains data structures that are shared across the application boundary

// Alert feed payloads
pub mod alerts;

// Common entities for error handling and query parameters
pub mod common;

// Reading and trend payloads
pub mod readings;

pub use common::{ErrorResponse, WindowQueryParams};
