//! Client for the Modash raw media endpoints.
//!
//! Fetches the provider's platform-specific post payload for a content URL.
//! Payloads are returned as raw JSON; interpreting them is the caller's job.

pub mod client;
pub mod error;

mod retry;

pub use client::{provider_error_message, ModashClient};
pub use error::ModashError;
pub use roster_core::{detect_platform_from_url, Platform};
