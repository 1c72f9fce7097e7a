use std::{net::SocketAddr, path::PathBuf, time::Duration};

use config::Config;
use server::ServeConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub fn get_test_cert_paths() -> (PathBuf, PathBuf) {
    let cert_path = PathBuf::from("test-certs/cert.pem");
    let key_path = PathBuf::from("test-certs/key.pem");

    (cert_path, key_path)
}

/// Test client for making HTTP requests to the test server
#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new test client that accepts the self-signed test certificate
    pub fn new_with_tls(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to create client with invalid cert acceptance");

        Self { base_url, client }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.request(reqwest::Method::GET, path).send().await.unwrap()
    }

    pub async fn try_get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.request(reqwest::Method::GET, path).send().await
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// A quota gateway running in the background on a random local port.
pub struct TestServer {
    pub client: TestClient,
    pub address: SocketAddr,
    pub config: Config,
    shutdown_signal: CancellationToken,
}

impl TestServer {
    /// Start a new test server with the given TOML configuration
    #[allow(clippy::panic)]
    pub async fn start(config_toml: &str) -> Self {
        // Goes through the loader, so validation and placeholders apply.
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, config_toml).unwrap();

        let config = Config::load(&config_path).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let has_tls = config.server.tls.is_some();
        let shutdown_signal = CancellationToken::new();

        let serve_config = ServeConfig {
            listen_address: address,
            config: config.clone(),
            shutdown_signal: shutdown_signal.clone(),
            log_filter: "server=debug,quota=debug,config=debug,integration_tests=debug".to_string(),
        };

        let (tx, mut rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            // Release the port for the server to bind.
            drop(listener);

            let _ = tx.send(server::serve(serve_config).await);
        });

        let protocol = if has_tls { "https" } else { "http" };
        let base_url = format!("{protocol}://{address}");

        let client = if has_tls {
            TestClient::new_with_tls(base_url)
        } else {
            TestClient::new(base_url)
        };

        let health_path = if config.server.health.enabled {
            config.server.health.path.clone()
        } else {
            config.quota.path.clone()
        };

        let mut last_error = None;

        for _ in 0..30 {
            if let Ok(Err(e)) = rx.try_recv() {
                panic!("Server failed to start: {e}");
            }

            match client.try_get(&health_path).await {
                Ok(_) => {
                    return TestServer {
                        client,
                        address,
                        config,
                        shutdown_signal,
                    };
                }
                Err(e) => last_error = Some(e),
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        panic!("Server failed to become ready after 30 retries. Last error: {last_error:?}");
    }

    pub fn shutdown(&self) {
        self.shutdown_signal.cancel();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown_signal.cancel();
    }
}
