// # ddns-core
//
// Core library for the DDNS provider handles.
//
// ## Architecture Overview
//
// This library provides the provider-neutral pieces of a dynamic DNS updater:
// - **Domain / AddressFamily / Ttl**: Normalized inputs used as cache keys and on the wire
// - **DnsHandle**: Trait for listing and mutating address records at a provider
// - **Auth**: Trait for verifying credentials and building a handle
// - **Diagnostics**: Sink for user-facing messages emitted by handles
// - **Error**: The failure taxonomy shared by every handle
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Provider logic lives in provider crates
// 2. **Caller-Owned Policy**: Handles never retry or schedule work
// 3. **No Panics**: Every failure is a returned `Error`

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod family;
pub mod traits;
pub mod ttl;

// Re-export core types for convenience
pub use config::{HandleConfig, ProviderConfig};
pub use diagnostics::{Diagnostics, Level, MemoryDiagnostics, Tag, TracingDiagnostics};
pub use domain::{Domain, DomainName};
pub use error::{Error, Mutation, Result};
pub use family::AddressFamily;
pub use traits::{Auth, DnsHandle, RecordMap};
pub use ttl::Ttl;
