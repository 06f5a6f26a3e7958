#![allow(non_snake_case)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bookbuddy_client::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use bookbuddy_client::{
    ClientError, GatewayClient, LibraryClient, MemoryStore, Session, SessionStore,
};
use bookbuddy_types::{
    BookDraft, RefreshRequest, RegisterRequest, ResetPasswordRequest, VerifyOtpRequest,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

fn token(sub: &str, generation: u32) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD
        .encode(json!({ "sub": sub, "name": "ada", "gen": generation }).to_string());
    format!("{header}.{payload}.sig")
}

#[derive(Default)]
struct Gateway {
    validToken: String,
    refreshAccepted: bool,
    refreshIssuesRevokedToken: bool,
    refreshCalls: u32,
    bookCalls: u32,
    lastRefresh: Option<Value>,
    lastUpload: Vec<u8>,
    books: Vec<Value>,
}

type Shared = Arc<Mutex<Gateway>>;

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "token expired" })),
    )
        .into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["password"] != "correct horse" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }
    let access = token("u-1", 1);
    state.lock().unwrap().validToken = access.clone();
    Json(json!({
        "accessToken": access,
        "refreshToken": "refresh-1",
        "userId": "u-1",
        "username": "ada",
        "email": body["email"],
    }))
    .into_response()
}

async fn google(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["idToken"] != "google-credential" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid Google token" })),
        )
            .into_response();
    }
    let access = token("g-7", 1);
    state.lock().unwrap().validToken = access.clone();
    Json(json!({
        "accessToken": access,
        "refreshToken": "refresh-g",
        "email": "grace@example.com",
        "profilePicture": "https://example.com/grace.png",
    }))
    .into_response()
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    if body["email"] == "ada@example.com" && body["otp"] == "123456" {
        Json(json!({ "message": "verified" })).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "message": "Invalid OTP" }))).into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    Json(json!({
        "accessToken": token("u-new", 1),
        "refreshToken": "refresh-new",
        "username": body["username"],
    }))
    .into_response()
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut gateway = state.lock().unwrap();
    gateway.refreshCalls += 1;
    gateway.lastRefresh = Some(body);
    if !gateway.refreshAccepted {
        return unauthorized();
    }
    let access = token("u-1", 2);
    if !gateway.refreshIssuesRevokedToken {
        gateway.validToken = access.clone();
    }
    Json(json!({ "accessToken": access, "refreshToken": "refresh-2" })).into_response()
}

async fn forgot_password(Json(body): Json<Value>) -> Response {
    if body["email"] == "nobody@example.com" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No account with that email" })),
        )
            .into_response();
    }
    Json(json!({ "message": "sent" })).into_response()
}

async fn reset_password(Json(body): Json<Value>) -> Response {
    if body["newPassword"].as_str().is_some() && body["otp"] == "123456" {
        StatusCode::OK.into_response()
    } else {
        (StatusCode::BAD_REQUEST, "bad reset").into_response()
    }
}

async fn list_books(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut gateway = state.lock().unwrap();
    gateway.bookCalls += 1;
    if bearer(&headers) != gateway.validToken {
        return unauthorized();
    }
    Json(Value::Array(gateway.books.clone())).into_response()
}

async fn create_book(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut gateway = state.lock().unwrap();
    gateway.bookCalls += 1;
    if bearer(&headers) != gateway.validToken {
        return unauthorized();
    }
    let id = gateway.books.len() + 1;
    gateway
        .books
        .push(json!({ "id": id, "name": body["name"], "author": body["author"] }));
    StatusCode::CREATED.into_response()
}

async fn update_book(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut gateway = state.lock().unwrap();
    if bearer(&headers) != gateway.validToken {
        return unauthorized();
    }
    match gateway
        .books
        .iter_mut()
        .find(|book| book["id"].to_string() == id)
    {
        Some(book) => {
            book["name"] = body["name"].clone();
            book["author"] = body["author"].clone();
            StatusCode::NO_CONTENT.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_book(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut gateway = state.lock().unwrap();
    if bearer(&headers) != gateway.validToken {
        return unauthorized();
    }
    gateway.books.retain(|book| book["id"].to_string() != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_excel(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let mut gateway = state.lock().unwrap();
    if bearer(&headers) != gateway.validToken {
        return unauthorized();
    }
    let isMultipart = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if !isMultipart {
        return (StatusCode::BAD_REQUEST, "expected multipart").into_response();
    }
    gateway.lastUpload = body.to_vec();
    "Imported 2 books".into_response()
}

async fn spawn_gateway(state: Shared) -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/google", post(google))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/refresh-token", post(refresh))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/upload-excel", post(upload_excel))
        .route("/api/books/:id", put(update_book).delete(delete_book))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn signed_in_client(state: Shared) -> (LibraryClient<MemoryStore>, MemoryStore) {
    let baseUrl = spawn_gateway(state).await;
    let store = MemoryStore::new();
    let client = LibraryClient::new(Session::new(store.clone()), GatewayClient::new(baseUrl));
    client
        .sign_in("ada@example.com", "correct horse")
        .await
        .unwrap();
    (client, store)
}

#[tokio::test]
async fn sign_in_persists_session() {
    let state = Shared::default();
    let (client, store) = signed_in_client(state).await;

    let user = client.session().user().unwrap();
    assert_eq!(user.user_id, "u-1");
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-1"));
    assert!(store.get(USER_KEY).unwrap().contains("\"userId\":\"u-1\""));
}

#[tokio::test]
async fn sign_in_surfaces_gateway_message() {
    let baseUrl = spawn_gateway(Shared::default()).await;
    let client = LibraryClient::new(Session::new(MemoryStore::new()), GatewayClient::new(baseUrl));

    let err = client.sign_in("ada@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.gateway_message(), Some("Invalid email or password"));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn unreachable_gateway_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = LibraryClient::new(
        Session::new(MemoryStore::new()),
        GatewayClient::new(format!("http://{addr}")),
    );

    let err = client.sign_in("ada@example.com", "x").await.unwrap_err();

    assert!(err.is_network());
}

#[tokio::test]
async fn register_signs_in() {
    let baseUrl = spawn_gateway(Shared::default()).await;
    let client = LibraryClient::new(Session::new(MemoryStore::new()), GatewayClient::new(baseUrl));

    let user = client
        .register(&RegisterRequest {
            username: "grace".into(),
            email: "grace@example.com".into(),
            password: "hopper".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.user_id, "u-new");
    assert_eq!(user.username, "grace");
}

#[tokio::test]
async fn google_sign_in_sends_id_token() {
    let baseUrl = spawn_gateway(Shared::default()).await;
    let store = MemoryStore::new();
    let client = LibraryClient::new(Session::new(store.clone()), GatewayClient::new(baseUrl));

    let err = client.sign_in_with_google("forged").await.unwrap_err();
    assert_eq!(err.gateway_message(), Some("Invalid Google token"));
    assert!(store.is_empty());

    let user = client
        .sign_in_with_google("google-credential")
        .await
        .unwrap();

    assert_eq!(user.user_id, "g-7");
    assert_eq!(user.username, "ada");
    assert_eq!(
        user.profile_picture.as_deref(),
        Some("https://example.com/grace.png")
    );
    assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-g"));
}

#[tokio::test]
async fn crud_round_trip() {
    let state = Shared::default();
    let (client, _) = signed_in_client(state.clone()).await;

    let draft = BookDraft {
        name: "Dune".into(),
        author: "Frank Herbert".into(),
    };
    client.save_book(None, &draft).await.unwrap();
    let books = client.books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, "1");

    let edited = BookDraft {
        name: "Dune Messiah".into(),
        author: "Frank Herbert".into(),
    };
    client.save_book(Some("1"), &edited).await.unwrap();
    assert_eq!(client.books().await.unwrap()[0].name, "Dune Messiah");

    client.delete_book("1").await.unwrap();
    assert!(client.books().await.unwrap().is_empty());

    let missing = client.save_book(Some("99"), &edited).await.unwrap_err();
    assert_eq!(missing.status(), Some(404));
}

#[tokio::test]
async fn expired_token_refreshes_once_and_retries() {
    let state = Shared::default();
    let (client, store) = signed_in_client(state.clone()).await;
    {
        let mut gateway = state.lock().unwrap();
        gateway.validToken = "rotated-elsewhere".into();
        gateway.refreshAccepted = true;
        gateway.bookCalls = 0;
    }

    let books = client.books().await.unwrap();

    assert!(books.is_empty());
    let gateway = state.lock().unwrap();
    assert_eq!(gateway.refreshCalls, 1);
    assert_eq!(gateway.bookCalls, 2);
    let sent: RefreshRequest =
        serde_json::from_value(gateway.lastRefresh.clone().unwrap()).unwrap();
    assert_eq!(sent.user_id, "u-1");
    assert_eq!(sent.refresh_token, "refresh-1");
    assert_eq!(store.get(ACCESS_TOKEN_KEY), Some(token("u-1", 2)));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-2"));
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn retry_is_not_repeated_when_new_token_is_also_rejected() {
    let state = Shared::default();
    let (client, _) = signed_in_client(state.clone()).await;
    {
        let mut gateway = state.lock().unwrap();
        gateway.validToken = "rotated-elsewhere".into();
        gateway.refreshAccepted = true;
        gateway.refreshIssuesRevokedToken = true;
        gateway.bookCalls = 0;
    }

    let err = client.books().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.gateway_message(), Some("token expired"));
    let gateway = state.lock().unwrap();
    assert_eq!(gateway.refreshCalls, 1);
    assert_eq!(gateway.bookCalls, 2);
}

#[tokio::test]
async fn rejected_refresh_signs_out() {
    let state = Shared::default();
    let (client, store) = signed_in_client(state.clone()).await;
    {
        let mut gateway = state.lock().unwrap();
        gateway.validToken = "rotated-elsewhere".into();
        gateway.bookCalls = 0;
    }

    let err = client.books().await.unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired));
    assert!(!client.session().is_authenticated());
    assert!(store.is_empty());
    let gateway = state.lock().unwrap();
    assert_eq!(gateway.refreshCalls, 1);
    assert_eq!(gateway.bookCalls, 1);
}

#[tokio::test]
async fn refresh_without_session_skips_the_network() {
    let state = Shared::default();
    let baseUrl = spawn_gateway(state.clone()).await;
    let store = MemoryStore::new();
    store.set(REFRESH_TOKEN_KEY, "refresh-1").unwrap();
    let client = LibraryClient::new(Session::new(store.clone()), GatewayClient::new(baseUrl));

    assert!(!client.refresh_access_token().await);

    assert_eq!(state.lock().unwrap().refreshCalls, 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn excel_upload_sends_multipart_file() {
    let state = Shared::default();
    let (client, _) = signed_in_client(state.clone()).await;

    let reply = client
        .import_excel("books.xlsx", b"PK-fake-workbook".to_vec())
        .await
        .unwrap();

    assert_eq!(reply, "Imported 2 books");
    let upload = String::from_utf8_lossy(&state.lock().unwrap().lastUpload).to_string();
    assert!(upload.contains("name=\"file\""));
    assert!(upload.contains("filename=\"books.xlsx\""));
    assert!(upload.contains("PK-fake-workbook"));
}

#[tokio::test]
async fn password_reset_endpoints() {
    let baseUrl = spawn_gateway(Shared::default()).await;
    let gateway = GatewayClient::new(format!("{baseUrl}/"));

    gateway.forgot_password("ada@example.com").await.unwrap();
    let err = gateway
        .forgot_password("nobody@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.gateway_message(), Some("No account with that email"));

    let verify = VerifyOtpRequest {
        email: "ada@example.com".into(),
        otp: "654321".into(),
    };
    let err = gateway.verify_otp(&verify).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.gateway_message(), Some("Invalid OTP"));
    gateway
        .verify_otp(&VerifyOtpRequest {
            otp: "123456".into(),
            ..verify
        })
        .await
        .unwrap();

    let request = ResetPasswordRequest {
        email: "ada@example.com".into(),
        otp: "000000".into(),
        new_password: "secret1".into(),
    };
    let err = gateway.reset_password(&request).await.unwrap_err();
    assert_eq!(err.gateway_message(), None);
    assert_eq!(err.body_text(), Some("bad reset"));

    let request = ResetPasswordRequest {
        otp: "123456".into(),
        ..request
    };
    gateway.reset_password(&request).await.unwrap();
}
