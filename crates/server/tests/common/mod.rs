#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use models::Role;
use serde_json::Value;
use service::auth::domain::{AuthUser, LoginInput};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::{self, auth::ServerState};

pub const PASSWORD: &str = "Sup3rSecret";

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

/// Router over a fresh migrated in-memory database.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let db = models::db::connect_memory().await?;
    models::db::migrate(&db).await?;
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = "integration-secret-0123456789".into();
    let state = ServerState::new(db, &cfg);
    let router = routes::build_router(state.clone(), CorsLayer::very_permissive(), "no-frontend-in-tests");
    Ok(TestApp { router, state })
}

impl TestApp {
    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<TestResponse> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(v) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&v)?))?,
            None => req.body(Body::empty())?,
        };
        let resp = self.router.clone().oneshot(req).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
        Ok(TestResponse { status, headers, text: String::from_utf8_lossy(&bytes).into_owned() })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> anyhow::Result<TestResponse> {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> anyhow::Result<TestResponse> {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> anyhow::Result<TestResponse> {
        self.request("PUT", uri, token, Some(body)).await
    }

    /// Create an account directly and return it with a bearer token.
    pub async fn user(&self, email: &str, name: &str, role: Role) -> anyhow::Result<(AuthUser, String)> {
        let user = self.state.auth.create_account(email, name, None, PASSWORD, role).await?;
        let session = self
            .state
            .auth
            .login(LoginInput { email: email.into(), password: PASSWORD.into() })
            .await?;
        Ok((user, session.token))
    }
}
