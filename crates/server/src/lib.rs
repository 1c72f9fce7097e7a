//! HTTP surface of the quota gateway.
//!
//! [`QuotaLayer`] can be put in front of any axum router. [`serve`] runs a
//! standalone decision service with it.

mod client_ip;
mod decision;
mod error;
mod headers;
mod health;
pub mod logger;
mod quota_layer;

use std::{net::SocketAddr, time::Duration};

use axum::{Router, routing::get};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use config::Config;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use error::Error;
pub use headers::{
    QUOTA_CLIENT_ALLOWED, QUOTA_CLIENT_IDENTIFIER, SPIKE_ARREST_CLIENT_ALLOWED, SPIKE_ARREST_CLIENT_IDENTIFIER,
};
pub use quota_layer::{QuotaLayer, QuotaService};

pub(crate) type Result<T> = std::result::Result<T, Error>;

const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub struct ServeConfig {
    pub listen_address: SocketAddr,
    pub config: Config,
    /// Cancel to stop accepting connections and drain in-flight requests.
    pub shutdown_signal: CancellationToken,
    /// Filter for the logger, e.g. "info" or "server=debug,quota=debug".
    pub log_filter: String,
}

/// Builds the application router: the decision endpoint behind the quota layer,
/// and the health endpoint outside of it.
pub fn router(config: &Config) -> crate::Result<Router> {
    let mut app = Router::new();

    if config.quota.enabled {
        let layer = QuotaLayer::new(&config.quota, config.server.client_ip.clone())?;

        let decision_routes = Router::new()
            .route(&config.quota.path, get(decision::decision).post(decision::decision))
            .with_state(layer.client_name_header().clone());

        app = app.merge(decision_routes).layer(layer);
    }

    if config.server.health.enabled {
        app = app.route(&config.server.health.path, get(health::health));
    }

    Ok(app)
}

pub async fn serve(
    ServeConfig {
        listen_address,
        config,
        shutdown_signal,
        log_filter,
    }: ServeConfig,
) -> crate::Result<()> {
    logger::init(&log_filter);

    let app = router(&config)?;
    let listener = TcpListener::bind(listen_address).await.map_err(Error::Bind)?;
    let local_address = listener.local_addr().map_err(Error::Bind)?;

    match &config.server.tls {
        Some(tls_config) => {
            // Another component may have installed a provider already.
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

            let rustls_config = RustlsConfig::from_pem_file(&tls_config.certificate, &tls_config.key)
                .await
                .map_err(|e| Error::Tls(e.to_string()))?;

            log_endpoints(&config, "https", local_address);

            let std_listener = listener.into_std().map_err(Error::Bind)?;

            let handle = Handle::new();
            let shutdown_handle = handle.clone();

            tokio::spawn(async move {
                shutdown_signal.cancelled().await;
                shutdown_handle.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
            });

            axum_server::from_tcp_rustls(std_listener, rustls_config)
                .handle(handle)
                .serve(app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .map_err(Error::Server)?;
        }
        None => {
            log_endpoints(&config, "http", local_address);

            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .with_graceful_shutdown(shutdown_signal.cancelled_owned())
                .await
                .map_err(Error::Server)?;
        }
    }

    log::info!("Quota gateway stopped");

    Ok(())
}

fn log_endpoints(config: &Config, scheme: &str, address: SocketAddr) {
    if config.quota.enabled {
        log::info!("Quota decision endpoint available at: {scheme}://{address}{}", config.quota.path);
    } else {
        log::warn!("Quota classification is disabled");
    }

    if config.server.health.enabled {
        log::info!("Health endpoint available at: {scheme}://{address}{}", config.server.health.path);
    }
}
