//! Core traits for the DDNS handles
//!
//! - [`DnsHandle`]: List, create, update and delete address records
//! - [`Auth`]: Verify credentials and build a handle

pub mod dns_handle;

pub use dns_handle::{Auth, DnsHandle, RecordMap};
