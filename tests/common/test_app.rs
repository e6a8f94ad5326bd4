use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use clash_royale_proxy::{
    infrastructure::{
        config::AppConfig,
        http::{build_state, create_app},
    },
    presentation::middleware::JwtService,
};
use std::{collections::HashMap, time::Duration};
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-clash-royale-api-key";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-chars-long"; // gitleaks:allow

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
}

impl TestApp {
    /// App pointed at `upstream_uri` with the default test settings
    pub fn new(upstream_uri: &str) -> Self {
        Self::with_env(upstream_uri, &[])
    }

    /// App pointed at `upstream_uri` with extra environment variables applied
    pub fn with_env(upstream_uri: &str, extra: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = [
            ("NODE_ENV", "test"),
            ("CLASH_ROYALE_API_KEY", TEST_API_KEY),
            ("JWT_SECRET", TEST_JWT_SECRET),
            ("REQUEST_TIMEOUT", "2000"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
        vars.insert("CLASH_ROYALE_BASE_URL".to_string(), format!("{upstream_uri}/v1"));
        for (k, v) in extra {
            vars.insert((*k).to_string(), (*v).to_string());
        }

        let config = AppConfig::load_from(|key| vars.get(key).cloned()).unwrap();
        let router = create_app(build_state(config.clone()).unwrap());

        Self { router, config }
    }

    /// A valid bearer token signed with the test secret
    pub fn token(&self) -> String {
        JwtService::new(TEST_JWT_SECRET).create_token("integration-test", Duration::from_secs(300)).unwrap()
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_headers(path, &[]).await
    }

    pub async fn get_authorized(&self, path: &str) -> TestResponse {
        let authorization = format!("Bearer {}", self.token());
        self.get_with_headers(path, &[("Authorization", authorization.as_str())]).await
    }

    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.request(Method::GET, path, headers).await
    }

    pub async fn request(&self, method: Method, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().uri(path).method(method);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let response = self.router.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        TestResponse::new(response).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();

        Self { status, headers, body }
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(self.status, expected, "Response body: {}", self.body);
    }

    pub fn json<T>(&self) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn error_message(&self) -> String {
        let value: serde_json::Value = self.json();
        value["error"]["message"].as_str().unwrap_or_default().to_string()
    }
}
