use serde::Deserialize;

/// Settings of the matching service, loaded from `config/*.yaml` and
/// `APP_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// SQLite database path or URL.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Cookie signing key shared with the auth service; at least 64 bytes.
    pub secret: String,
    /// Where unauthenticated users are sent to log in.
    pub auth_service_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
