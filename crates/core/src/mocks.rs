//! Mock oracle implementations for testing.
//!
//! Used across the workspace to exercise the dispatch engine without a real
//! completion endpoint.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::traits::OracleClient;
use crate::{Error, Result};

enum Behavior {
    /// Reply with entries from the script, repeating the last one.
    Reply,
    /// Fail every call with a transport error.
    Fail,
    /// Never resolve.
    Stall,
}

/// Scripted mock oracle with call accounting.
pub struct MockOracle {
    responses: Mutex<Vec<String>>,
    behavior: Behavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockOracle {
    /// Create a mock that returns responses from a queue, repeating the last
    /// entry once the queue is exhausted.
    pub fn scripted(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            behavior: Behavior::Reply,
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns the same raw reply.
    pub fn replying(response: &str) -> Self {
        Self::scripted(vec![response.to_string()])
    }

    /// Create a mock that fails every call with a transport error.
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            ..Self::scripted(Vec::new())
        }
    }

    /// Create a mock whose calls never resolve.
    pub fn stalled() -> Self {
        Self {
            behavior: Behavior::Stall,
            ..Self::scripted(Vec::new())
        }
    }

    /// Sleep for `delay` before resolving each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// High-water mark of simultaneously executing calls.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OracleClient for MockOracle {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        let count = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Behavior::Stall = self.behavior {
            std::future::pending::<()>().await;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.behavior {
            Behavior::Fail => Err(Error::oracle_transport("mock oracle failure")),
            _ => {
                let responses = self.responses.lock().unwrap();
                let idx = (count - 1).min(responses.len().saturating_sub(1));
                responses
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| Error::oracle_format("mock oracle has no scripted reply"))
            }
        }
    }
}
