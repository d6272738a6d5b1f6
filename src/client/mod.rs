pub mod error;
pub mod jobs;

// Re-export commonly used types
pub use error::ClientError;
pub use jobs::{ApiResponse, JobsClient};
