//! Adapter layer modules for external system integration.
//!
//! Provides the blocking HTTP client used to download published trust lists.

pub mod trust_list_http_client;
