use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Deployment stage of the scoring service. Controls the default log filter
/// only; scoring math is identical in every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    /// Default tracing directive for this stage. Development turns the
    /// scoring pipeline up to debug; everything else stays at info.
    fn default_log_filter(self) -> &'static str {
        match self {
            Self::Development => "info,sim_scoring=debug",
            Self::Test | Self::Production => "info",
        }
    }
}

/// Configuration for the scoring service, read once at startup from
/// `SCORING_*` environment variables (a `.env` file is honored in
/// development).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_label(
            &env::var("SCORING_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("SCORING_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("SCORING_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            Err(_) => 8080,
        };

        let log_filter = env::var("SCORING_LOG_FILTER")
            .unwrap_or_else(|_| environment.default_log_filter().to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_filter },
        })
    }
}

/// Bind address for the scoring HTTP endpoints.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|source| ConfigError::InvalidHost {
            host: self.host.clone(),
            source,
        })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing directive for the scoring pipeline, consumed by `telemetry::init`.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_filter: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "SCORING_PORT '{value}' is not a valid port number")
            }
            ConfigError::InvalidHost { host, .. } => {
                write!(
                    f,
                    "SCORING_HOST '{host}' must be 'localhost' or an IP address"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("SCORING_ENV");
        env::remove_var("SCORING_HOST");
        env::remove_var("SCORING_PORT");
        env::remove_var("SCORING_LOG_FILTER");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_filter, "info,sim_scoring=debug");
    }

    #[test]
    fn production_environment_quiets_the_default_filter() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.environment.label(), "production");
        assert_eq!(config.telemetry.log_filter, "info");
        env::remove_var("SCORING_ENV");
    }

    #[test]
    fn explicit_filter_overrides_the_environment_default() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_LOG_FILTER", "warn");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.log_filter, "warn");
        env::remove_var("SCORING_LOG_FILTER");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));
        env::remove_var("SCORING_HOST");
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_PORT", "not-a-port");
        let result = AppConfig::load();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPort { value }) if value == "not-a-port"
        ));
        env::remove_var("SCORING_PORT");
    }

    #[test]
    fn rejects_unparseable_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_HOST", "scores.internal");
        let config = AppConfig::load().expect("config loads");
        let result = config.server.socket_addr();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidHost { host, .. }) if host == "scores.internal"
        ));
        env::remove_var("SCORING_HOST");
    }
}
