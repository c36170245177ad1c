#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use jobboard_core::db::MemoryStore;
use jobboard_core::domain::{Role, User};
use jobboard_core::services::TokenService;
use jobboard_core::{create_app, AppState};

pub const SECRET: &str = "test_secret_key";
pub const PASSWORD: &str = "P@ssw0rd123!";

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub tokens: TokenService,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let tokens = TokenService::new(SECRET);
        let router = create_app(AppState::new(store.clone(), tokens.clone()));
        Self {
            router,
            store,
            tokens,
        }
    }

    /// Inserts a user directly into the store with a fixed id.
    pub async fn seed_user(&self, id: &str, email: &str, role: Role) -> User {
        let now = Utc::now();
        let user = User {
            id: id.to_string(),
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
            image: None,
            created_at: now,
            updated_at: now,
        };
        self.store.seed_user(user.clone()).await;
        user
    }

    pub fn token_for(&self, id: &str, role: Role) -> String {
        self.tokens.issue(id, role).unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let raw = body.map(|json| json.to_string());
        self.raw_request(method, uri, authorization, raw.as_deref())
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Sends `body` verbatim, with a JSON content type when one is given.
    pub async fn raw_request(
        &self,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }

        let request = match body {
            Some(raw) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(raw.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn bearer_request(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(method, uri, Some(&format!("Bearer {}", token)), body)
            .await
    }

    /// Creates a user through the public route and logs in, returning the token.
    pub async fn register_and_login(&self, email: &str, user_type: &str) -> String {
        let (status, _) = self
            .request(
                "POST",
                "/user/create",
                None,
                Some(serde_json::json!({
                    "fullName": "Jane Doe",
                    "email": email,
                    "password": PASSWORD,
                    "type": user_type,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .request(
                "POST",
                "/user/login",
                None,
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["user"]["token"].as_str().unwrap().to_string()
    }
}

/// Alters one character in the payload segment of a JWT.
pub fn tamper(token: &str) -> String {
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let payload = &mut parts[1];
    let mid = payload.len() / 2;
    let current = payload.as_bytes()[mid] as char;
    let replacement = if current == 'A' { 'B' } else { 'A' };
    payload.replace_range(mid..mid + 1, &replacement.to_string());
    parts.join(".")
}
