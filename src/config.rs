use std::{net::SocketAddr, time::Duration};

use clap::Parser;

pub const DEFAULT_API_URL: &str = "https://api.browserstack.com/automate/plan.json";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "plan-exporter",
    about = "Exports BrowserStack Automate plan usage as Prometheus metrics"
)]
pub struct Config {
    /// The address to listen on for HTTP requests.
    #[arg(long, env = "PLAN_EXPORTER_LISTEN_ADDRESS", default_value = "127.0.0.1:5123")]
    pub listen_address: SocketAddr,

    /// The username for authentication to the API endpoint.
    #[arg(long, env = "PLAN_EXPORTER_USERNAME", default_value = "")]
    pub username: String,

    /// The password for authentication to the API endpoint.
    #[arg(long, env = "PLAN_EXPORTER_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Plan status endpoint polled on every scrape.
    #[arg(long, env = "PLAN_EXPORTER_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Upstream request timeout, in seconds.
    #[arg(
        long,
        env = "PLAN_EXPORTER_TIMEOUT_SECS",
        default_value_t = 2,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
