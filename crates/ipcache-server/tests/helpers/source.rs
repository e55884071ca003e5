//! Mock IP source that counts calls and concurrent invocations.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ipcache_server::{IpSource, UpstreamError};

/// Scripted upstream reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Ip(&'static str),
    TransportError,
    BodyError,
}

/// IpSource de prueba: responde segun el script y registra la concurrencia.
pub struct CountingSource {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    latency: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CountingSource {
    /// Always answers with `ip`.
    pub fn always(ip: &'static str) -> Self {
        Self::scripted(vec![], Reply::Ip(ip))
    }

    /// Always fails at the transport level.
    pub fn failing() -> Self {
        Self::scripted(vec![], Reply::TransportError)
    }

    /// Answers with `script` in order, then with `fallback` forever.
    pub fn scripted(script: Vec<Reply>, fallback: Reply) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight counter even when the fetch future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IpSource for CountingSource {
    async fn fetch(&self) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Ip(ip) => Ok(ip.to_string()),
            Reply::TransportError => Err(UpstreamError::Transport("connection refused".into())),
            Reply::BodyError => Err(UpstreamError::Body("unexpected EOF".into())),
        }
    }

    fn name(&self) -> &str {
        "counting"
    }
}
