#![deny(unused)]
//! Core types, traits, and error definitions for Service Finder.
//!
//! This crate provides the building blocks shared by the dispatch engine and
//! the oracle transport: the service catalog, the classification result model,
//! configuration loading, and the oracle client trait.

pub mod catalog;
pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use catalog::Catalog;
pub use crate::config::AppConfig;
pub use error::{Error, Result};
pub use traits::OracleClient;
pub use types::{ClassificationResult, ServiceMatch};
