//! Account and session operations
//!
//! Login and registration establish the in-memory session; logout is best
//! effort and always forgets the credential locally. Password changes are
//! validated before anything is sent.

use crate::http::{ApiClient, Auth};
use crate::{CorkboardError, Result};
use kanban_api::{
    endpoints, AuthResponse, ChangePasswordRequest, LoginRequest, MeResponse, RegisterRequest,
    User,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Authentication against the Kanban API
#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// User of the current session, if signed in
    pub fn current_user(&self) -> Option<User> {
        self.client.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(CorkboardError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .client
            .post(endpoints::auth::LOGIN, &request, Auth::Anonymous)
            .await?
            .into_json()?;

        info!(user_id = %response.user.id, "Logged in");
        Ok(self.establish(response))
    }

    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> Result<User> {
        let full_name = full_name.trim();
        let email = email.trim();
        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(CorkboardError::Validation(
                "Name, email and password are required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CorkboardError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let request = RegisterRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .client
            .post(endpoints::auth::REGISTER, &request, Auth::Anonymous)
            .await?
            .into_json()?;

        info!(user_id = %response.user.id, "Registered");
        Ok(self.establish(response))
    }

    fn establish(&self, response: AuthResponse) -> User {
        self.client
            .session()
            .establish(response.access_token, response.user.clone());
        response.user
    }

    /// Tell the server to revoke the refresh cookie, then clear the session
    ///
    /// Server failures are logged and otherwise ignored.
    pub async fn logout(&self) {
        if let Err(e) = self
            .client
            .post_empty(endpoints::auth::LOGOUT, Auth::Bearer)
            .await
        {
            warn!(error = %e, "Logout request failed; clearing session anyway");
        }
        self.client.session().clear();
        debug!("Session cleared");
    }

    /// Fetch the signed-in user and remember it on the session
    pub async fn me(&self) -> Result<User> {
        let response: MeResponse = self
            .client
            .get(endpoints::auth::ME, Auth::Bearer)
            .await?
            .into_json()?;
        self.client.session().set_user(response.user.clone());
        Ok(response.user)
    }

    /// Resume a session from the refresh cookie
    ///
    /// `Ok(None)` when there is nothing to resume.
    pub async fn restore_session(&self) -> Result<Option<User>> {
        match self.client.refresh_session().await {
            Ok(()) => {}
            Err(CorkboardError::SessionExpired) => return Ok(None),
            Err(e) => return Err(e),
        }

        match self.current_user() {
            Some(user) => Ok(Some(user)),
            None => self.me().await.map(Some),
        }
    }

    pub async fn change_password(
        &self,
        current: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<()> {
        validate_password_change(current, new_password, confirmation)?;

        let request = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new_password.to_string(),
        };
        self.client
            .post(endpoints::auth::CHANGE_PASSWORD, &request, Auth::Bearer)
            .await?;

        info!("Password changed");
        Ok(())
    }
}

/// Check a password change locally
pub fn validate_password_change(current: &str, new_password: &str, confirmation: &str) -> Result<()> {
    let invalid = |msg: &str| Err(CorkboardError::Validation(msg.to_string()));

    if current.is_empty() || new_password.is_empty() || confirmation.is_empty() {
        return invalid("All fields are required");
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CorkboardError::Validation(format!(
            "New password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if new_password != confirmation {
        return invalid("New passwords do not match");
    }
    if new_password == current {
        return invalid("New password must be different from current password");
    }
    Ok(())
}
