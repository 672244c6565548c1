//! Sign-in, sign-up, and sign-out orchestration.
//!
//! The token arrives in the `x-auth-token` response header; the role comes
//! from the body's `roles` list. Both are cached through the
//! [`SessionStore`] so a restart can restore the session without a fresh
//! sign-in.

use tracing::info;

use eshop_client::EshopApi;
use eshop_client::types::{SigninRequest, SignupRequest};
use eshop_core::Email;

use crate::error::{Result, StorefrontError};
use crate::session::{Session, SessionStore};

/// Sign-up form as typed by the user, validated before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub contact_number: String,
}

impl SignupForm {
    /// Validate the form into a wire payload.
    ///
    /// # Errors
    ///
    /// Returns a validation error (and therefore issues no network call)
    /// when a required field is empty, the email does not parse, or the
    /// password confirmation does not match.
    pub fn validate(&self) -> Result<SignupRequest> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.contact_number,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(StorefrontError::Validation(
                "Please fill all required fields!".to_string(),
            ));
        }

        if self.password != self.confirm_password {
            return Err(StorefrontError::Validation(
                "Passwords do not match".to_string(),
            ));
        }

        let email = Email::parse(self.email.trim())
            .map_err(|e| StorefrontError::Validation(e.to_string()))?;

        Ok(SignupRequest {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email,
            password: self.password.clone(),
            contact_number: self.contact_number.trim().to_owned(),
        })
    }
}

/// Sign in and cache the resulting session.
///
/// # Errors
///
/// Returns [`eshop_client::ApiError::InvalidCredentials`] (wrapped) when the
/// service rejects the credentials, or a store error if caching fails.
pub async fn sign_in<A: EshopApi, S: SessionStore>(
    api: &A,
    store: &S,
    email: &str,
    password: &str,
) -> Result<Session> {
    let request = SigninRequest {
        username: email.to_owned(),
        password: password.to_owned(),
    };
    let outcome = api.sign_in(&request).await?;

    let session = Session::new(outcome.token, outcome.role);
    store.save(&session)?;
    info!(role = %session.role, "signed in");
    Ok(session)
}

/// Validate and submit a sign-up. Expects `201 Created` from the service.
///
/// # Errors
///
/// Returns a validation error without any network call when the form is
/// incomplete, otherwise any API failure.
pub async fn sign_up<A: EshopApi>(api: &A, form: &SignupForm) -> Result<()> {
    let request = form.validate()?;
    api.sign_up(&request).await?;
    info!(email = %request.email, "account created");
    Ok(())
}

/// Destroy the session: the cache is wiped entirely.
///
/// # Errors
///
/// Returns a store error if the cache cannot be removed.
pub fn sign_out<S: SessionStore>(store: &S) -> Result<()> {
    store.clear()?;
    info!("signed out");
    Ok(())
}

/// Restore a cached session at startup, if one exists.
///
/// # Errors
///
/// Returns a store error when the cache exists but cannot be read.
pub fn restore<S: SessionStore>(store: &S) -> Result<Option<Session>> {
    Ok(store.load()?)
}
