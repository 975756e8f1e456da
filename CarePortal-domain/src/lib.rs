// CarePortal Domain
// This crate contains the health-metric trend, alert and insight logic for CarePortal

// Runtime configuration
pub mod config;

// Error taxonomy shared by the services
pub mod errors;

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Health checks and system status
pub mod health;

// Re-export the database module from care_portal_data for convenience
pub use care_portal_data::database;

pub use config::PortalConfig;
pub use errors::PortalError;
