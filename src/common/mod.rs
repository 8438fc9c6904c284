pub mod error;

pub use error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;
