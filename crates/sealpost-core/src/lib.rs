//! `Sealpost` Core Library
//!
//! Shared functionality for `Sealpost` components:
//! - Configuration resolution and hierarchy
//! - Tracing initialisation
//! - Common error types

pub mod config;
pub mod error;
pub mod tracing_init;

pub use config::{Config, LoggingConfig, PskConfig, PskDerivation};
pub use error::{Error, Result};
