//! E-Shop Admin - Product management for elevated users.
//!
//! Everything here is gated on [`eshop_core::Role::Admin`]. The gate is a
//! usability guard, not a security boundary; the remote service enforces
//! authorization on every write.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod editor;

pub use editor::{CategoryPicker, EditorError, ProductEditor, ProductForm};
