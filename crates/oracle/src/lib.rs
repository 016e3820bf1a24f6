#![deny(unused)]
//! Oracle transport for Service Finder.
//!
//! This crate provides the reqwest-based client for the OpenAI-compatible
//! completion endpoint (OpenRouter in the reference deployment), including
//! request timeout enforcement and response envelope parsing.

pub mod client;

pub use client::CompletionClient;
