use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 6000);

#[derive(Debug, Parser)]
#[command(name = "quota-gateway", version, about = "Assigns quota and spike arrest allowances to journey planner clients")]
pub struct Args {
    /// IP address and port to listen on. Overrides `server.listen_address` in the configuration.
    #[arg(short, long, env = "QUOTA_GATEWAY_LISTEN_ADDRESS")]
    pub listen_address: Option<SocketAddr>,

    /// Path to the TOML configuration file.
    #[arg(short, long, env = "QUOTA_GATEWAY_CONFIG", default_value = "./quota-gateway.toml")]
    pub config: PathBuf,

    /// Log filter, e.g. "info" or "server=debug,quota=debug".
    #[arg(long, env = "QUOTA_GATEWAY_LOG", default_value = "info")]
    pub log: String,

    /// Print finished request spans to stdout.
    #[arg(long, env = "QUOTA_GATEWAY_TRACE_CONSOLE")]
    pub trace_console: bool,
}

impl Args {
    pub fn listen_address(&self, config: &config::Config) -> SocketAddr {
        self.listen_address
            .or(config.server.listen_address)
            .unwrap_or(DEFAULT_LISTEN_ADDRESS)
    }
}
