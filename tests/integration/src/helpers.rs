//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use politalk_api::{create_app, create_app_state};
use politalk_common::AppConfig;
use politalk_core::{Snowflake, UserRepository, UserRole};
use politalk_db::{create_pool, PgUserRepository, PoolConfig};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Prefix of every API route
pub const API_PREFIX: &str = "/api/v1";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    config: AppConfig,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config.clone()).await?;
        let app = create_app(state)?;

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            config,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of an API route
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url())
    }

    fn with_token(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET a path outside the API prefix (health checks, images)
    pub async fn get_raw(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// GET an API route
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let builder = self.client.get(self.api_url(path));
        Ok(Self::with_token(builder, token).send().await?)
    }

    /// POST an API route with a JSON body
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        let builder = self.client.post(self.api_url(path)).json(body);
        Ok(Self::with_token(builder, token).send().await?)
    }

    /// POST an API route without a body
    pub async fn post_empty(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let builder = self.client.post(self.api_url(path));
        Ok(Self::with_token(builder, token).send().await?)
    }

    /// PATCH an API route with a JSON body
    pub async fn patch<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let builder = self.client.patch(self.api_url(path)).json(body);
        Ok(builder.bearer_auth(token).send().await?)
    }

    /// PUT an API route with a JSON body
    pub async fn put<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let builder = self.client.put(self.api_url(path)).json(body);
        Ok(builder.bearer_auth(token).send().await?)
    }

    /// DELETE an API route
    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        let builder = self.client.delete(self.api_url(path));
        Ok(builder.bearer_auth(token).send().await?)
    }

    /// Upload raw bytes as an image
    pub async fn upload(
        &self,
        filename: Option<&str>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Response> {
        let mut builder = self.client.post(self.api_url("/uploads")).body(bytes);
        if let Some(content_type) = content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(name) = filename {
            builder = builder.header("x-filename", name);
        }
        Ok(builder.send().await?)
    }

    /// Give a registered user the admin role directly in the database
    pub async fn promote_to_admin(&self, user_id: &str) -> Result<()> {
        let pool = create_pool(&PoolConfig::from(&self.config.database)).await?;
        let id: Snowflake = user_id.parse()?;
        PgUserRepository::new(pool)
            .set_role(id, UserRole::Admin)
            .await?;
        Ok(())
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    // Tests fire requests back to back
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    config.storage.upload_dir = std::env::temp_dir()
        .join("politalk-integration-uploads")
        .to_string_lossy()
        .into_owned();

    Ok(config)
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error status and return the error code from the JSON body
pub async fn assert_error_code(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("error body without code: {body}"))
}
