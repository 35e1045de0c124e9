// # Memory Diagnostics
//
// In-memory implementation of Diagnostics.
//
// ## Purpose
//
// Keeps every message in emission order so that callers can inspect exactly
// what a handle reported. Nothing is printed.
//
// ## When to Use
//
// - Tests asserting on the messages of a single operation
// - Embedders that render messages themselves after an operation returns

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Diagnostics, Level, Tag};

/// One recorded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub tag: Tag,
    pub text: String,
}

/// In-memory diagnostics sink
///
/// Clones share the same buffer.
///
/// # Example
///
/// ```rust
/// use ddns_core::diagnostics::{Diagnostics, MemoryDiagnostics, Tag};
///
/// let sink = MemoryDiagnostics::new();
/// sink.warning(Tag::Error, "Failed to find the zone of \"sub.test.org\"");
///
/// assert_eq!(sink.texts(), vec!["Failed to find the zone of \"sub.test.org\""]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDiagnostics {
    inner: Arc<Mutex<Vec<Message>>>,
}

impl MemoryDiagnostics {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Message>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All messages recorded so far
    pub fn messages(&self) -> Vec<Message> {
        self.guard().clone()
    }

    /// Text of all messages recorded so far
    pub fn texts(&self) -> Vec<String> {
        self.guard().iter().map(|m| m.text.clone()).collect()
    }

    /// Get the number of recorded messages
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Drop all recorded messages
    pub fn clear(&self) {
        self.guard().clear();
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, level: Level, tag: Tag, message: &str) {
        self.guard().push(Message {
            level,
            tag,
            text: message.to_string(),
        });
    }
}
