//! HTTP client with credential injection and centralized failure handling.
//!
//! Every outgoing call runs through the same pipeline: the request
//! interceptor attaches the bearer token, successful responses pass through
//! untouched, and failures are classified once, trigger their user-facing
//! side effect, and are re-raised to the caller unchanged.

mod client;
mod failure;
mod request;

pub use client::{
    ApiClient, ApiResponse, ClientConfig, ResponseBody, DEFAULT_RETRY_COUNT, DEFAULT_TIMEOUT_MS,
};
pub use failure::{classify_status, ErrorKind, Failure};
pub use request::{attach_authorization, pass_through, RequestConfig, ResponseKind};
