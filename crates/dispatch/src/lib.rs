#![deny(unused)]
//! Classification dispatch engine for Service Finder.
//!
//! This crate provides the HTTP entry point and the dispatch-and-cache core:
//! per-key request coalescing, bounded oracle concurrency, catalog validation
//! of untrusted oracle output, and process-lifetime result memoization.

pub mod cache;
pub mod dispatcher;
pub mod prompt;
pub mod reply;
pub mod scheduler;
pub mod server;

pub use cache::ResultCache;
pub use dispatcher::CoalescingDispatcher;
pub use scheduler::OracleScheduler;
pub use server::{FinderServer, ServerConfig};
