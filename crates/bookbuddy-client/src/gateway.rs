use bookbuddy_types::{
    AuthResponse, Book, BookDraft, ForgotPasswordRequest, GoogleLoginRequest, LoginRequest,
    MessageResponse, RefreshRequest, RegisterRequest, ResetPasswordRequest, VerifyOtpRequest,
};
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};

/// Thin typed wrapper over the gateway's `/auth` and `/api` endpoints.
///
/// Every method makes exactly one request; retry and token refresh live in
/// [`crate::LibraryClient`].
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(baseUrl: impl Into<String>) -> Self {
        Self::with_client(Client::new(), baseUrl)
    }

    fn with_client(http: Client, baseUrl: impl Into<String>) -> Self {
        let baseUrl: String = baseUrl.into();
        Self {
            http,
            base_url: baseUrl.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(ensure_success(response).await?.json::<T>().await?)
    }

    async fn post_json_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.post_json("/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.post_json("/auth/register", request).await
    }

    pub async fn google_login(&self, idToken: &str) -> Result<AuthResponse> {
        let request = GoogleLoginRequest {
            id_token: idToken.to_string(),
        };
        self.post_json("/auth/google", &request).await
    }

    pub async fn refresh_token(&self, request: &RefreshRequest) -> Result<AuthResponse> {
        self.post_json("/auth/refresh-token", request).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.post_json_unit("/auth/forgot-password", &request).await
    }

    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<()> {
        self.post_json_unit("/auth/verify-otp", request).await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<()> {
        self.post_json_unit("/auth/reset-password", request).await
    }

    // Book endpoints only build requests so the caller can re-send them with
    // a fresh token.

    pub fn list_books(&self, token: &str) -> RequestBuilder {
        self.http.get(self.url("/api/books")).bearer_auth(token)
    }

    pub fn create_book(&self, token: &str, draft: &BookDraft) -> RequestBuilder {
        self.http
            .post(self.url("/api/books"))
            .bearer_auth(token)
            .json(draft)
    }

    pub fn update_book(&self, token: &str, id: &str, draft: &BookDraft) -> RequestBuilder {
        self.http
            .put(self.url(&format!("/api/books/{id}")))
            .bearer_auth(token)
            .json(draft)
    }

    pub fn delete_book(&self, token: &str, id: &str) -> RequestBuilder {
        self.http
            .delete(self.url(&format!("/api/books/{id}")))
            .bearer_auth(token)
    }

    pub fn upload_excel(&self, token: &str, fileName: &str, contents: Vec<u8>) -> RequestBuilder {
        let part = multipart::Part::bytes(contents).file_name(fileName.to_string());
        let form = multipart::Form::new().part("file", part);
        self.http
            .post(self.url("/api/books/upload-excel"))
            .bearer_auth(token)
            .multipart(form)
    }
}

/// Passes 2xx responses through and turns everything else into [`ClientError::Api`].
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&body)
        .ok()
        .and_then(|m| m.message)
        .filter(|m| !m.is_empty());

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
        body,
    })
}

pub async fn read_books(response: Response) -> Result<Vec<Book>> {
    Ok(ensure_success(response).await?.json::<Vec<Book>>().await?)
}
