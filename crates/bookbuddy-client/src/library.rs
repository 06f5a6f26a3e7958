use bookbuddy_types::{Book, BookDraft, LoginRequest, RefreshRequest, RegisterRequest, User};
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::gateway::{ensure_success, read_books, GatewayClient};
use crate::session::Session;
use crate::storage::SessionStore;

/// The session together with the gateway it authenticates against.
pub struct LibraryClient<S> {
    session: Session<S>,
    gateway: GatewayClient,
}

impl<S> Clone for LibraryClient<S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            gateway: self.gateway.clone(),
        }
    }
}

impl<S: SessionStore> LibraryClient<S> {
    pub fn new(session: Session<S>, gateway: GatewayClient) -> Self {
        Self { session, gateway }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = self.gateway.login(&request).await?;
        let user = self
            .session
            .login(&auth.access_token, &auth.refresh_token, &auth.profile())?;
        info!(user_id = %user.user_id, "signed in with password");
        Ok(user)
    }

    pub async fn sign_in_with_google(&self, idToken: &str) -> Result<User> {
        let auth = self.gateway.google_login(idToken).await?;
        let user = self
            .session
            .login(&auth.access_token, &auth.refresh_token, &auth.profile())?;
        info!(user_id = %user.user_id, "signed in with google");
        Ok(user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let auth = self.gateway.register(request).await?;
        let user = self
            .session
            .login(&auth.access_token, &auth.refresh_token, &auth.profile())?;
        info!(user_id = %user.user_id, "registered");
        Ok(user)
    }

    pub fn sign_out(&self) {
        self.session.logout();
    }

    /// Trades the refresh token for a new pair. Any failure ends the session.
    pub async fn refresh_access_token(&self) -> bool {
        let (Some(refreshToken), Some(user)) = (self.session.refresh_token(), self.session.user())
        else {
            debug!("no refresh token or user, signing out");
            self.session.logout();
            return false;
        };

        let request = RefreshRequest {
            user_id: user.user_id,
            refresh_token: refreshToken,
        };

        let refreshed = match self.gateway.refresh_token(&request).await {
            Ok(auth) => self
                .session
                .login(&auth.access_token, &auth.refresh_token, &auth.profile()),
            Err(e) => Err(e),
        };

        match refreshed {
            Ok(_) => {
                debug!("access token refreshed");
                true
            }
            Err(e) => {
                warn!("token refresh failed: {e}");
                self.session.logout();
                false
            }
        }
    }

    /// Sends a bearer request; on 401 refreshes once and re-sends once.
    async fn send_authorized<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&GatewayClient, &str) -> RequestBuilder,
    {
        let token = self.session.access_token().unwrap_or_default();
        let response = build(&self.gateway, &token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!("gateway rejected access token");
        if !self.refresh_access_token().await {
            return Err(ClientError::SessionExpired);
        }

        let token = self.session.access_token().unwrap_or_default();
        Ok(build(&self.gateway, &token).send().await?)
    }

    pub async fn books(&self) -> Result<Vec<Book>> {
        let response = self
            .send_authorized(|gateway, token| gateway.list_books(token))
            .await?;
        read_books(response).await
    }

    /// Creates a book, or updates `editingId` when set.
    pub async fn save_book(&self, editingId: Option<&str>, draft: &BookDraft) -> Result<()> {
        let response = self
            .send_authorized(|gateway, token| match editingId {
                Some(id) => gateway.update_book(token, id, draft),
                None => gateway.create_book(token, draft),
            })
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    pub async fn delete_book(&self, id: &str) -> Result<()> {
        let response = self
            .send_authorized(|gateway, token| gateway.delete_book(token, id))
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Uploads a spreadsheet for import and returns the gateway's text reply.
    pub async fn import_excel(&self, fileName: &str, contents: Vec<u8>) -> Result<String> {
        let response = self
            .send_authorized(|gateway, token| {
                gateway.upload_excel(token, fileName, contents.clone())
            })
            .await?;
        Ok(ensure_success(response).await?.text().await?)
    }
}
