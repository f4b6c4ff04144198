//! Infrastructure layer for cross-cutting concerns.
//!
//! - Configuration file management and validation
//! - Error handling and result types

pub mod config;
pub mod error;
