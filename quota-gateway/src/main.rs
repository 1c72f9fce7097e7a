use anyhow::Context;
use args::Args;
use clap::Parser;
use config::Config;
use fastrace::collector::{Config as TraceConfig, ConsoleReporter};
use server::ServeConfig;
use tokio_util::sync::CancellationToken;

mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Before loading, so configuration warnings are visible.
    server::logger::init(&args.log);

    if args.trace_console {
        fastrace::set_reporter(ConsoleReporter, TraceConfig::default());
    }

    let config = if args.config.exists() {
        Config::load(&args.config).with_context(|| format!("failed to load {}", args.config.display()))?
    } else {
        log::warn!("Configuration file {} not found, using defaults", args.config.display());
        Config::default()
    };

    let shutdown_signal = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown_signal.clone()));

    let serve_config = ServeConfig {
        listen_address: args.listen_address(&config),
        config,
        shutdown_signal,
        log_filter: args.log,
    };

    let result = server::serve(serve_config).await;

    fastrace::flush();

    Ok(result?)
}

async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    log::info!("Shutdown signal received, draining connections");
    token.cancel();
}
