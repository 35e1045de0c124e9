// # Diagnostics Sink
//
// Handles report everything a user should see (skipped zones, degraded
// zones, failed operations) through a `Diagnostics` implementation passed
// to each call. Internal bookkeeping (cache hits, request paths) goes
// straight to `tracing` instead.
//
// ## Implementations
//
// - `TracingDiagnostics`: forwards to `tracing` events with a `tag` field
// - `MemoryDiagnostics`: records messages in order (tests, embedding)

pub mod memory;

pub use memory::{MemoryDiagnostics, Message};

use std::fmt;

/// Severity level of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Classifies what a message is about, independently of its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Ordinary progress
    Notice,
    /// Something works but deserves attention
    Warning,
    /// An operation failed
    Error,
    /// A failure caused by user-supplied settings
    UserError,
    /// The provider returned something that should not happen
    Impossible,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tag::Notice => "notice",
            Tag::Warning => "warning",
            Tag::Error => "error",
            Tag::UserError => "user-error",
            Tag::Impossible => "impossible",
        })
    }
}

/// Receiver of leveled, tagged messages
///
/// Implementations must be thread-safe; one sink may be shared by update
/// workers running concurrently.
pub trait Diagnostics: Send + Sync {
    /// Emit one message
    fn emit(&self, level: Level, tag: Tag, message: &str);

    /// Emit an informational message
    fn info(&self, tag: Tag, message: &str) {
        self.emit(Level::Info, tag, message);
    }

    /// Emit a warning
    fn warning(&self, tag: Tag, message: &str) {
        self.emit(Level::Warning, tag, message);
    }

    /// Emit an error
    fn error(&self, tag: Tag, message: &str) {
        self.emit(Level::Error, tag, message);
    }
}

/// Sink that turns every message into a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, level: Level, tag: Tag, message: &str) {
        match level {
            Level::Info => tracing::info!(tag = %tag, "{}", message),
            Level::Warning => tracing::warn!(tag = %tag, "{}", message),
            Level::Error => tracing::error!(tag = %tag, "{}", message),
        }
    }
}
