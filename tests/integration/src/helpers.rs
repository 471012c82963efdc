//! Test helpers for integration tests
//!
//! Spawns the server on an ephemeral port, makes HTTP requests and seeds
//! organizations, which have no HTTP surface of their own.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use anyhow::Result;
use kanbon_api::server::{create_app, create_app_state};
use kanbon_common::{
    AppConfig, AppSettings, BootstrapConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, ServerConfig, SnowflakeConfig,
};
use kanbon_core::{
    GlobalId, MembershipRole, NodeType, Organization, OrganizationRepository, Snowflake,
    SnowflakeGenerator,
};
use kanbon_db::{create_pool, PgOrganizationRepository};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Superuser created by [`TestServer::start_with_superuser`]
pub const SUPERUSER_EMAIL: &str = "superuser@kanbon.test";
pub const SUPERUSER_PASSWORD: &str = "SuperPass123";

/// Servers share one database, so each gets its own Snowflake worker
static WORKER_COUNTER: AtomicU16 = AtomicU16::new(1);

fn next_worker_id() -> u16 {
    WORKER_COUNTER.fetch_add(1, Ordering::SeqCst) % SnowflakeGenerator::MAX_WORKER_ID
}

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
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server that bootstraps [`SUPERUSER_EMAIL`]
    pub async fn start_with_superuser() -> Result<Self> {
        let mut config = test_config()?;
        config.bootstrap = BootstrapConfig {
            superuser_email: Some(SUPERUSER_EMAIL.to_string()),
            superuser_password: Some(SUPERUSER_PASSWORD.to_string()),
        };
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config.clone()).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

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

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    async fn send(request: RequestBuilder, token: Option<&str>) -> Result<Response> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Self::send(self.client.get(self.url(path)), None).await
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Self::send(self.client.get(self.url(path)), Some(token)).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Self::send(self.client.post(self.url(path)).json(body), None).await
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Self::send(self.client.post(self.url(path)).json(body), Some(token)).await
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Self::send(self.client.patch(self.url(path)).json(body), Some(token)).await
    }

    /// Create an organization with the given admin and members; returns its global id
    pub async fn seed_organization(&self, admin: &str, members: &[&str]) -> Result<String> {
        let pool = create_pool(&kanbon_db::DatabaseConfig::from(&self.config.database)).await?;
        let repo = PgOrganizationRepository::new(pool);

        let organization = Organization::new(
            SnowflakeGenerator::new(next_worker_id()).generate(),
            "Integration".to_string(),
        );
        repo.create(&organization).await?;
        repo.set_membership(organization.id, admin.parse()?, MembershipRole::Admin)
            .await?;
        for member in members {
            repo.set_membership(organization.id, member.parse()?, MembershipRole::Member)
                .await?;
        }

        Ok(GlobalId::new(NodeType::Organization, organization.id).encode())
    }
}

/// Configuration pointing at `DATABASE_URL`
pub fn test_config() -> Result<AppConfig> {
    let url = std::env::var("DATABASE_URL")?;
    Ok(AppConfig {
        app: AppSettings {
            name: "kanbon-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 3600,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1,
            burst: 1000,
        },
        cors: CorsConfig::default(),
        snowflake: SnowflakeConfig {
            worker_id: next_worker_id(),
        },
        bootstrap: BootstrapConfig::default(),
    })
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Global id of another node type, for negative tests
pub fn global_id(node_type: NodeType, id: i64) -> String {
    GlobalId::new(node_type, Snowflake::new(id)).encode()
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

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("error body without code: {body}"))
}
