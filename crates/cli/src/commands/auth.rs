//! Session commands: login, logout, signup.

use eshop_storefront::auth::{self, SignupForm};

use super::CliError;

/// Sign in and cache the session in the store.
#[allow(clippy::print_stdout)]
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let (api, store) = super::anonymous_client()?;
    let session = auth::sign_in(&api, &store, email, password).await?;
    println!("Signed in as {email} ({})", session.role);
    Ok(())
}

/// Destroy the cached session.
#[allow(clippy::print_stdout)]
pub fn logout() -> Result<(), CliError> {
    let (_, store) = super::setup()?;
    auth::sign_out(&store)?;
    println!("Signed out");
    Ok(())
}

/// Create a new account. The password is confirmed by the flag itself, so
/// confirmation mirrors the password here.
#[allow(clippy::print_stdout)]
pub async fn signup(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
    contact_number: &str,
) -> Result<(), CliError> {
    let (api, _) = super::anonymous_client()?;
    let form = SignupForm {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        confirm_password: password.to_owned(),
        contact_number: contact_number.to_owned(),
    };
    auth::sign_up(&api, &form).await?;
    println!("Account created for {email}; you can now log in");
    Ok(())
}
