//! HTTP access to the survey service.

pub mod client;

pub use client::{ApiClient, ApiError, ApiResult};
