//! Reqwest implementation of [`EshopApi`].

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use eshop_core::{ProductId, Role};

use crate::api::{ApiError, EshopApi, SigninOutcome};
use crate::types::{
    Address, NewAddress, OrderRequest, Product, ProductPayload, SigninRequest, SigninResponse,
    SignupRequest,
};

/// Header carrying the session token on every authenticated call, and the
/// response header carrying the freshly minted token after signin.
const AUTH_HEADER: &str = "x-auth-token";

/// HTTP client for the E-Shop REST API.
///
/// Holds the base URL, a bounded-timeout reqwest client, and the session
/// token when one is present. Cloning is cheap; the token is never printed
/// by the `Debug` impl.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "token",
                &self.token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ApiClient {
    /// Create an unauthenticated client.
    ///
    /// Every request carries the given timeout; the service has none of its
    /// own, and hanging indefinitely on a dead connection is worse than a
    /// clear failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            token: None,
        })
    }

    /// Attach a session token; subsequent calls send it as `x-auth-token`.
    pub fn set_token(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    /// Drop the session token, reverting to unauthenticated calls.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Whether a session token is currently attached.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.endpoint(path));
        if let Some(token) = &self.token {
            builder = builder.header(AUTH_HEADER, token.expose_secret());
        }
        builder
    }

    /// Map a non-success response to the error taxonomy.
    async fn error_for(response: Response, resource: &str) -> ApiError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound(resource.to_owned()),
            _ => {
                let message = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), resource, "API request failed");
                ApiError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }

    async fn expect_success(response: Response, resource: &str) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_for(response, resource).await)
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl EshopApi for ApiClient {
    async fn sign_in(&self, request: &SigninRequest) -> Result<SigninOutcome, ApiError> {
        debug!(username = %request.username, "signing in");
        let response = self
            .client
            .post(self.endpoint("auth/signin"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The service answers bad credentials with a 4xx; anything in
            // that band reads as "invalid email or password" to the user.
            if status.is_client_error() {
                return Err(ApiError::InvalidCredentials);
            }
            return Err(Self::error_for(response, "signin").await);
        }

        let token = response
            .headers()
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| SecretString::from(s.to_owned()))
            .ok_or(ApiError::MissingToken)?;

        let body: SigninResponse = Self::parse_json(response).await.unwrap_or_default();
        let role = body
            .roles
            .first()
            .map_or(Role::User, |name| Role::from_role_name(name));

        debug!(%role, "signed in");
        Ok(SigninOutcome { token, role })
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("auth/signup"))
            .json(request)
            .send()
            .await?;
        Self::expect_success(response, "signup").await?;
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.request(Method::GET, "products").send().await?;
        let response = Self::expect_success(response, "products").await?;
        Self::parse_json(response).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let response = self
            .request(Method::GET, &format!("products/{id}"))
            .send()
            .await?;
        let response = Self::expect_success(response, &format!("product {id}")).await?;
        Self::parse_json(response).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        let response = self
            .request(Method::GET, "products/categories")
            .send()
            .await?;
        let response = Self::expect_success(response, "categories").await?;
        Self::parse_json(response).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        debug!(name = %payload.name, "creating product");
        let response = self
            .request(Method::POST, "products")
            .json(payload)
            .send()
            .await?;
        let response = Self::expect_success(response, "products").await?;
        Self::parse_json(response).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        debug!(%id, name = %payload.name, "updating product");
        let response = self
            .request(Method::PUT, &format!("products/{id}"))
            .json(payload)
            .send()
            .await?;
        let response = Self::expect_success(response, &format!("product {id}")).await?;
        Self::parse_json(response).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        debug!(%id, "deleting product");
        let response = self
            .request(Method::DELETE, &format!("products/{id}"))
            .send()
            .await?;
        Self::expect_success(response, &format!("product {id}")).await?;
        Ok(())
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let response = self.request(Method::GET, "addresses").send().await?;
        let response = Self::expect_success(response, "addresses").await?;
        Self::parse_json(response).await
    }

    async fn create_address(&self, address: &NewAddress) -> Result<Address, ApiError> {
        debug!(city = %address.city, "saving address");
        let response = self
            .request(Method::POST, "addresses")
            .json(address)
            .send()
            .await?;
        let response = Self::expect_success(response, "addresses").await?;
        Self::parse_json(response).await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<(), ApiError> {
        debug!(
            product_id = %order.product_id,
            quantity = order.quantity,
            address_id = %order.address_id,
            "placing order"
        );
        let response = self
            .request(Method::POST, "orders")
            .json(order)
            .send()
            .await?;
        Self::expect_success(response, "orders").await?;
        Ok(())
    }
}
