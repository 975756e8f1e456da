// Repository module structure
pub mod errors;
mod alerts;
mod in_memory;
mod metrics;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use alerts::{AlertRepository, AlertRepositoryTrait};
pub use in_memory::InMemoryStorage;
pub use metrics::{MetricRepository, MetricRepositoryTrait};

// Mock repositories for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub mod mock;
