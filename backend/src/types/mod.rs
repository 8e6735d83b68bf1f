mod config;
mod environment;
mod error;
mod extractors;
mod response;

pub use config::{ServiceConfig, DEFAULT_MAX_FILE_SIZE, DEFAULT_PRESIGNED_URL_EXPIRY_SECS};
pub use environment::Environment;
pub use error::{AppError, ErrorBody};
pub use extractors::ValidatedJson;
pub use response::ApiResponse;
