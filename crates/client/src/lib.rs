//! HTTP client for the remote E-Shop REST API.
//!
//! # Architecture
//!
//! - The remote service owns all durable state; this crate only reads and
//!   writes through its REST endpoints and never caches results.
//! - [`EshopApi`] is the seam between the flows and the wire: production code
//!   uses [`ApiClient`] (reqwest), tests substitute an in-memory fake.
//! - Authenticated calls carry the session token in the `x-auth-token`
//!   header; the token itself lives in a [`secrecy::SecretString`].
//!
//! # Example
//!
//! ```rust,ignore
//! use eshop_client::{ApiClient, EshopApi};
//!
//! let mut client = ApiClient::new(base_url, timeout)?;
//! let outcome = client.sign_in("user@example.com", "secret").await?;
//! client.set_token(outcome.token.clone());
//!
//! let products = client.list_products().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
mod http;
pub mod types;

pub use api::{ApiError, EshopApi, SigninOutcome};
pub use http::ApiClient;
