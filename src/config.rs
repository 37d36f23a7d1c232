use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "lightning-address-server")]
#[command(about = "LUD-16 Lightning Address server backed by LND")]
#[command(version)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Public base URL of this server (e.g., "https://pay.example.com")
    #[arg(long, env = "BACKEND_URL", value_parser = parse_base_url)]
    pub backend_url: String,

    /// LND REST host including scheme (e.g., "https://127.0.0.1")
    #[arg(long, env = "LND_HOST")]
    pub lnd_host: String,

    /// LND REST port
    #[arg(long, env = "LND_REST_PORT", default_value = "8080")]
    pub lnd_rest_port: u16,

    /// Hex-encoded invoice macaroon
    #[arg(long, env = "LND_MACAROON", hide_env_values = true)]
    pub lnd_macaroon: String,

    /// Timeout for invoice creation calls, in seconds
    #[arg(long, env = "LND_TIMEOUT_SECS", default_value = "30")]
    pub lnd_timeout_secs: u64,

    /// Accept self-signed LND certificates
    #[arg(long, env = "LND_ACCEPT_INVALID_CERTS")]
    pub lnd_accept_invalid_certs: bool,

    /// TOML file with per-user payment parameters
    #[arg(long, env = "USERS_FILE")]
    pub users_file: Option<PathBuf>,
}

impl Config {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn lnd_timeout(&self) -> Duration {
        Duration::from_secs(self.lnd_timeout_secs)
    }

    /// Discovery URL that a Lightning Address for `username` resolves to
    pub fn pay_request_url(&self, username: &str) -> String {
        format!("{}/.well-known/lnurlp/{}", self.backend_url, username)
    }

    pub fn callback_url(&self, username: &str) -> String {
        format!("{}/api/callback/{}", self.backend_url, username)
    }
}

/// Accepts only absolute http(s) URLs and strips any trailing slash so paths
/// can be appended directly.
fn parse_base_url(s: &str) -> Result<String, String> {
    let url = url::Url::parse(s).map_err(|e| format!("invalid URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    Ok(s.trim_end_matches('/').to_string())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::parse_from([
        "lightning-address-server",
        "--backend-url",
        "https://pay.example.com/",
        "--lnd-host",
        "https://127.0.0.1",
        "--lnd-macaroon",
        "0201036c6e64",
    ])
}
