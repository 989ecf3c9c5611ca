// tests/common/mod.rs
//! In-process stand-in for the remote API, with a hit counter per endpoint.
#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use masar_client::config::ApiConfig;
use masar_client::core::HttpClient;
use masar_client::types::AuthResponse;
use masar_client::TokenStore;

pub const VALID_TOKEN: &str = "tok-123";
pub const VALID_OTP: &str = "123456";
pub const KNOWN_EMAIL: &str = "jane@example.com";
pub const KNOWN_PASSWORD: &str = "correct-horse";
pub const DOWNLOAD_BYTES: &[u8] = b"PK\x03\x04optimized";

#[derive(Default)]
pub struct Hits {
    pub login: AtomicUsize,
    pub register: AtomicUsize,
    pub forgot_password: AtomicUsize,
    pub verify_otp: AtomicUsize,
    pub reset_password: AtomicUsize,
    pub optimize: AtomicUsize,
    pub optimization: AtomicUsize,
    pub download: AtomicUsize,
    pub misc: AtomicUsize,
    /// Size of the last optimize body
    pub upload_bytes: AtomicUsize,
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

pub struct MockApi {
    pub base_url: String,
    pub hits: Arc<Hits>,
}

impl MockApi {
    pub async fn start() -> Self {
        let hits = Arc::new(Hits::default());

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/forgot-password", post(forgot_password))
            .route("/api/auth/verify-otp", post(verify_otp))
            .route("/api/auth/reset-password", post(reset_password))
            .route("/api/cv/optimize", post(optimize))
            .route("/api/cv/optimizations/{id}", get(optimization))
            .route("/api/cv/download/{id}", get(download))
            .route("/api/protected", get(protected))
            .route("/api/empty", get(empty))
            .route("/api/boom", get(boom))
            .route("/api/validation", get(validation))
            .route("/api/echo-auth", get(echo_auth))
            .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
            .with_state(Arc::clone(&hits));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::with_base_url(&self.base_url)
    }

    pub fn http(&self, tokens: Arc<TokenStore>) -> Arc<HttpClient> {
        Arc::new(HttpClient::new(&self.config(), tokens).unwrap())
    }
}

/// A store that already holds a session with `token`
pub fn signed_in(token: &str) -> Arc<TokenStore> {
    let tokens = Arc::new(TokenStore::in_memory());
    tokens
        .save(&AuthResponse {
            token: Some(token.to_string()),
            user_id: Some("42".into()),
            email: Some(KNOWN_EMAIL.into()),
            full_name: Some("Jane Doe".into()),
            role: Some("Student".into()),
            expires_at: Some("2030-01-01T00:00:00Z".into()),
        })
        .unwrap();
    tokens
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn session_body(email: &str, full_name: &str) -> Value {
    json!({
        "token": VALID_TOKEN,
        "userID": 42,
        "email": email,
        "fullName": full_name,
        "role": "Student",
        "expiresAt": "2030-01-01T00:00:00Z"
    })
}

fn optimization_body(file_name: &str) -> Value {
    json!({
        "optimizationId": 7,
        "qualityScore": 82.5,
        "grade": "A-",
        "fileName": file_name,
        "downloadUrl": "/api/cv/download/7",
        "skillsDetected": {"Backend": ["Rust"]},
        "experienceAnalyzed": [{
            "headers": ["Acme | Engineer"],
            "achievements": [{"text": "Did things", "score": 4, "feedback": [], "fixed": "Cut latency 40%", "fixed_score": 8, "was_fixed": true}]
        }]
    })
}

async fn login(State(hits): State<Arc<Hits>>, Json(body): Json<Value>) -> Response {
    hits.login.fetch_add(1, Ordering::SeqCst);

    if body["email"] == KNOWN_EMAIL && body["password"] == KNOWN_PASSWORD {
        Json(session_body(KNOWN_EMAIL, "Jane Doe")).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password | البريد الإلكتروني أو كلمة المرور غير صحيحة"})),
        )
            .into_response()
    }
}

async fn register(State(hits): State<Arc<Hits>>, Json(body): Json<Value>) -> Response {
    hits.register.fetch_add(1, Ordering::SeqCst);

    if body["email"] == "taken@example.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Email already registered | البريد الإلكتروني مسجل بالفعل"})),
        )
            .into_response();
    }
    if body["role"] != "Student" && body["role"] != "Admin" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"errors": {"role": ["Invalid role"]}})),
        )
            .into_response();
    }

    let email = body["email"].as_str().unwrap_or_default();
    let full_name = body["fullName"].as_str().unwrap_or_default();
    Json(session_body(email, full_name)).into_response()
}

async fn forgot_password(State(hits): State<Arc<Hits>>, Json(_): Json<Value>) -> Response {
    hits.forgot_password.fetch_add(1, Ordering::SeqCst);
    Json(json!({"message": "OTP sent", "success": true})).into_response()
}

fn otp_rejected() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"message": "Invalid or expired OTP | رمز التحقق غير صالح"})),
    )
        .into_response()
}

async fn verify_otp(State(hits): State<Arc<Hits>>, Json(body): Json<Value>) -> Response {
    hits.verify_otp.fetch_add(1, Ordering::SeqCst);

    if body["otpCode"] == VALID_OTP {
        Json(json!({"message": "OTP verified", "success": true})).into_response()
    } else {
        otp_rejected()
    }
}

async fn reset_password(State(hits): State<Arc<Hits>>, Json(body): Json<Value>) -> Response {
    hits.reset_password.fetch_add(1, Ordering::SeqCst);

    if body["otpCode"] == VALID_OTP && body["newPassword"].as_str().is_some() {
        // some deployments answer with an empty body
        StatusCode::OK.into_response()
    } else {
        otp_rejected()
    }
}

async fn optimize(State(hits): State<Arc<Hits>>, headers: HeaderMap, body: Bytes) -> Response {
    hits.optimize.fetch_add(1, Ordering::SeqCst);
    hits.upload_bytes.store(body.len(), Ordering::SeqCst);

    match bearer(&headers) {
        Some(VALID_TOKEN) => {}
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Token expired | انتهت صلاحية الجلسة"})),
            )
                .into_response()
        }
    }

    let text = String::from_utf8_lossy(&body);
    let original = text
        .split("filename=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or("cv");

    if original.starts_with("unreadable") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "Could not read document"})),
        )
            .into_response();
    }
    if original.starts_with("garbled") {
        return (StatusCode::OK, "not json").into_response();
    }

    let stem = original.rsplit_once('.').map(|(s, _)| s).unwrap_or(original);
    Json(optimization_body(&format!("{}_optimized.docx", stem))).into_response()
}

async fn optimization(State(hits): State<Arc<Hits>>, Path(id): Path<i64>) -> Response {
    hits.optimization.fetch_add(1, Ordering::SeqCst);

    if id == 7 {
        Json(optimization_body("resume_optimized.docx")).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response()
    }
}

async fn download(
    State(hits): State<Arc<Hits>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    hits.download.fetch_add(1, Ordering::SeqCst);

    match bearer(&headers) {
        Some(VALID_TOKEN) => DOWNLOAD_BYTES.into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn protected(State(hits): State<Arc<Hits>>) -> Response {
    hits.misc.fetch_add(1, Ordering::SeqCst);
    StatusCode::UNAUTHORIZED.into_response()
}

async fn empty(State(hits): State<Arc<Hits>>) -> Response {
    hits.misc.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK.into_response()
}

async fn boom(State(hits): State<Arc<Hits>>) -> Response {
    hits.misc.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "boom"})),
    )
        .into_response()
}

async fn validation(State(hits): State<Arc<Hits>>) -> Response {
    hits.misc.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"message": "Bad input | مدخلات خاطئة", "errors": {"email": ["taken"]}})),
    )
        .into_response()
}

async fn echo_auth(headers: HeaderMap) -> Json<Value> {
    Json(json!({ "authorization": headers.get("authorization").and_then(|v| v.to_str().ok()) }))
}
