use bookbuddy_types::PublicConfig;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub google: GoogleConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL that `/auth/*` and `/api/*` are relayed to.
    pub url: String,
    pub timeout_secs: u64,
    /// Skip TLS verification towards the gateway. Only for gateways with self-signed certs.
    pub accept_invalid_certs: bool,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".into(),
            timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

impl Config {
    pub fn public(&self) -> PublicConfig {
        PublicConfig {
            google_client_id: self.google.client_id.clone().filter(|id| !id.is_empty()),
        }
    }
}

pub fn load(path: &str) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to parse config {path}: {e}, using defaults");
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!("failed to read config {path}: {e}, using defaults");
            Config::default()
        }
    }
}

/// Value following `--config` in `args`, else `config.example.toml`.
pub fn config_path_from_args(args: &[String]) -> String {
    args.iter()
        .position(|a| a == "--config")
        .and_then(|idx| args.get(idx + 1))
        .cloned()
        .unwrap_or_else(|| "config.example.toml".into())
}
