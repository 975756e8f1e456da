pub mod alerts;
pub mod dashboard;
pub mod health;
pub mod insights;
pub mod readings;
pub mod sustainability;

// Tests module
#[cfg(test)]
pub(crate) mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
