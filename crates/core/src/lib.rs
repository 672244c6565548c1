//! E-Shop Core - Shared types library.
//!
//! This crate provides common types used across all E-Shop client components:
//! - `client` - HTTP client for the remote E-Shop REST API
//! - `storefront` - Shopper-facing catalog and checkout flows
//! - `admin` - Product management for elevated users
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, roles, and emails
//! - [`notify`] - One-shot notification queue passed between flows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod notify;
pub mod types;

pub use notify::{Notification, NotificationQueue, Severity};
pub use types::*;
