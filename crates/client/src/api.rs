//! The `EshopApi` seam and the client error taxonomy.

use secrecy::SecretString;
use thiserror::Error;

use eshop_core::{ProductId, Role};

use crate::types::{
    Address, NewAddress, OrderRequest, Product, ProductPayload, SigninRequest, SignupRequest,
};

/// Errors that can occur when talking to the E-Shop API.
///
/// The taxonomy the flows rely on:
/// - [`ApiError::Unauthorized`] - the session is missing or expired; the user
///   must sign in again. Never auto-redirected outside the signin flow.
/// - everything else - a generic retryable failure. No automatic retry and
///   no backoff anywhere; the triggering flow surfaces it and waits for the
///   user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the session token (401).
    #[error("session expired, please log in again")]
    Unauthorized,

    /// Signin rejected the credentials.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Signin succeeded but the response carried no `x-auth-token` header.
    #[error("signin response is missing the x-auth-token header")]
    MissingToken,
}

impl ApiError {
    /// Whether retrying the same call could succeed.
    ///
    /// Validation never reaches the wire, so everything except an auth
    /// rejection is presented as retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unauthorized | Self::InvalidCredentials)
    }
}

/// Outcome of a successful signin.
#[derive(Debug, Clone)]
pub struct SigninOutcome {
    /// Bearer token for subsequent `x-auth-token` headers.
    pub token: SecretString,
    /// Role derived from the first entry of the response's `roles` list.
    pub role: Role,
}

/// Operations of the remote E-Shop REST API.
///
/// Implemented by [`ApiClient`](crate::ApiClient) over HTTP and by in-memory
/// fakes in tests. Every read is idempotent; calling a read twice with no
/// intervening mutation yields the same data (assuming a stable backend).
#[allow(async_fn_in_trait)]
pub trait EshopApi {
    /// `POST /auth/signin`. The token is returned in a response header.
    async fn sign_in(&self, request: &SigninRequest) -> Result<SigninOutcome, ApiError>;

    /// `POST /auth/signup`. Expects `201 Created`.
    async fn sign_up(&self, request: &SignupRequest) -> Result<(), ApiError>;

    /// `GET /products` in service-defined order.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// `GET /products/:id`.
    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError>;

    /// `GET /products/categories`.
    async fn list_categories(&self) -> Result<Vec<String>, ApiError>;

    /// `POST /products` (admin). Returns the created product.
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError>;

    /// `PUT /products/:id` (admin). Full replacement; returns the product.
    async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError>;

    /// `DELETE /products/:id` (admin).
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;

    /// `GET /addresses` for the signed-in shopper.
    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError>;

    /// `POST /addresses`. Returns the saved address with its server ID.
    async fn create_address(&self, address: &NewAddress) -> Result<Address, ApiError>;

    /// `POST /orders`. Success is `200` or `201`.
    async fn place_order(&self, order: &OrderRequest) -> Result<(), ApiError>;
}
