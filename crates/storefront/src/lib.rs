//! Shopper-facing flows for the E-Shop client.
//!
//! All durable state lives behind the remote REST API; this crate holds the
//! in-memory view and flow state and orchestrates calls through
//! [`eshop_client::EshopApi`]. Refreshes happen through explicit, named
//! triggers (`on_mount`, `on_filter_changed`, `on_order_placed`) rather than
//! inferred dependency tracking, and cross-flow signals travel through the
//! one-shot [`eshop_core::NotificationQueue`].
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`session`] - Session object and its persisted cache
//! - [`auth`] - Sign-in / sign-up / sign-out orchestration
//! - [`catalog`] - Product listing with the filter/sort pipeline
//! - [`detail`] - Product detail and quantity validation
//! - [`checkout`] - The three-step order flow state machine
//! - [`error`] - Crate-level error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod detail;
pub mod error;
pub mod session;

pub use error::{Result, StorefrontError};
