//! # Diagnostic Message Sinks
//!
//! Passes write human-readable messages to a [`MessageSink`] and never read
//! them back. The sink is passed in explicitly; there is no global one.

use parking_lot::Mutex;
use std::fmt::Display;
use std::io::Write;
use std::sync::Arc;

/// Append-only diagnostic channel
pub trait MessageSink {
    /// Record one message
    fn emit(&mut self, message: &dyn Display);
}

/// Writes one line per message to standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl MessageSink for StderrSink {
    fn emit(&mut self, message: &dyn Display) {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        // A closed stderr leaves nowhere to report the failure.
        let _ = writeln!(handle, "{}", message);
    }
}

/// Records messages in memory
#[derive(Debug, Default, Clone)]
pub struct CapturingSink {
    messages: Vec<String>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in emission order
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Take the recorded messages, leaving the sink empty
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl MessageSink for CapturingSink {
    fn emit(&mut self, message: &dyn Display) {
        self.messages.push(message.to_string());
    }
}

/// Forwards messages to `tracing` at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn emit(&mut self, message: &dyn Display) {
        tracing::warn!(target: "whiley_cfa::diagnostics", "{}", message);
    }
}

/// A capturing sink that several threads can append to
#[derive(Debug, Default, Clone)]
pub struct SharedSink {
    inner: Arc<Mutex<CapturingSink>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages so far
    pub fn messages(&self) -> Vec<String> {
        self.inner.lock().messages().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl MessageSink for SharedSink {
    fn emit(&mut self, message: &dyn Display) {
        self.inner.lock().emit(message);
    }
}
