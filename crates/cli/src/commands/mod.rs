//! Command implementations and shared setup.

use thiserror::Error;

use eshop_admin::EditorError;
use eshop_client::{ApiClient, ApiError};
use eshop_storefront::checkout::CheckoutError;
use eshop_storefront::config::{ConfigError, EshopConfig};
use eshop_storefront::session::{FileSessionStore, Session, SessionError};
use eshop_storefront::StorefrontError;

pub mod admin;
pub mod auth;
pub mod order;
pub mod products;

/// Errors surfaced to the top level of the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    /// No cached session; the command needs `eshop login` first.
    #[error("not signed in; run `eshop login` first")]
    NotSignedIn,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Load config and build the session store.
pub fn setup() -> Result<(EshopConfig, FileSessionStore), CliError> {
    let config = EshopConfig::from_env()?;
    let store = FileSessionStore::new(config.session_file.clone());
    Ok((config, store))
}

/// An unauthenticated client, for signin/signup.
pub fn anonymous_client() -> Result<(ApiClient, FileSessionStore), CliError> {
    let (config, store) = setup()?;
    Ok((config.api_client()?, store))
}

/// A client carrying the cached session token.
pub fn signed_in_client() -> Result<(ApiClient, Session), CliError> {
    let (config, store) = setup()?;
    let session = eshop_storefront::auth::restore(&store)?.ok_or(CliError::NotSignedIn)?;

    let mut api = config.api_client()?;
    api.set_token(session.token.clone());
    Ok((api, session))
}
