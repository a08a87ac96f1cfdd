//! Fixed-window rate limiting for authentication endpoints.

mod config;
mod ports;
mod service;

pub use config::RateLimitRule;
pub use ports::{RateLimitInfo, RateLimitRepository};
pub use service::RateLimitService;
