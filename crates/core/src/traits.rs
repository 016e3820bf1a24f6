//! Oracle client interface.

use async_trait::async_trait;

use crate::error::Result;

/// External classification oracle.
///
/// Implementations own their transport and timeout: a single slow or hung
/// call must fail with [`crate::Error::Timeout`] or
/// [`crate::Error::OracleTransport`] rather than block indefinitely. The
/// returned text is the raw classifier output and is treated as untrusted by
/// the dispatcher.
#[async_trait]
pub trait OracleClient: Send + Sync {
    /// Run one completion with a system instruction and a user utterance.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
