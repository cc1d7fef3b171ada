use domain::services::SignatureSurface;
use serde::Deserialize;
use std::net::SocketAddr;

use crate::services::QrOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Fixed administrator credentials
    pub admin: AdminConfig,
    pub documents: DocumentsConfig,
    pub signature: SignatureConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Send Strict-Transport-Security (only behind TLS termination)
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,

    #[serde(default = "default_admin_password")]
    pub password: String,

    /// Session lifetime in seconds (default: 28800 = 8 hours)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    /// Origin used in QR code links, e.g. `https://os.example.com`
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// QR code image width in pixels
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,

    /// Draw the standard quiet zone around QR codes
    #[serde(default = "default_qr_quiet_zone")]
    pub qr_quiet_zone: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureConfig {
    #[serde(default = "default_signature_width")]
    pub width: u32,

    #[serde(default = "default_signature_height")]
    pub height: u32,

    /// Height of the surface embedded in the signing page
    #[serde(default = "default_signature_embedded_height")]
    pub embedded_height: u32,

    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Load demo orders, template and collaborators at startup
    #[serde(default = "default_seed")]
    pub seed: bool,

    #[serde(default = "default_units")]
    pub units: Vec<String>,
}

/// Optional static frontend served for every non-API path.
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_frontend_dir")]
    pub static_dir: String,

    /// Cache max-age for `index.html` and other unhashed files
    #[serde(default = "default_mutable_cache_max_age")]
    pub mutable_cache_max_age: u32,

    /// Cache max-age for hashed files under `assets/`
    #[serde(default = "default_immutable_cache_max_age")]
    pub immutable_cache_max_age: u32,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            static_dir: default_frontend_dir(),
            mutable_cache_max_age: default_mutable_cache_max_age(),
            immutable_cache_max_age: default_immutable_cache_max_age(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    2_097_152
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_admin_username() -> String {
    "admin".to_string()
}
fn default_admin_password() -> String {
    "admin123".to_string()
}
fn default_session_ttl() -> i64 {
    28800
}
fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_qr_size() -> u32 {
    200
}
fn default_qr_quiet_zone() -> bool {
    true
}
fn default_signature_width() -> u32 {
    400
}
fn default_signature_height() -> u32 {
    200
}
fn default_signature_embedded_height() -> u32 {
    150
}
fn default_stroke_width() -> f32 {
    2.0
}
fn default_seed() -> bool {
    true
}
fn default_units() -> Vec<String> {
    persistence::seed::DEFAULT_UNITS
        .iter()
        .map(|u| u.to_string())
        .collect()
}
fn default_frontend_dir() -> String {
    "frontend/dist".to_string()
}
fn default_mutable_cache_max_age() -> u32 {
    60
}
fn default_immutable_cache_max_age() -> u32 {
    31536000
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with OS__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("OS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("store.units")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 2097152

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            hsts_enabled = false

            [admin]
            username = "admin"
            password = "admin123"
            session_ttl_secs = 28800

            [documents]
            public_base_url = "http://localhost:8080"
            qr_size = 200
            qr_quiet_zone = true

            [signature]
            width = 400
            height = 200
            embedded_height = 150
            stroke_width = 2.0

            [store]
            seed = true
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.admin.username.trim().is_empty() || self.admin.password.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "OS__ADMIN__USERNAME and OS__ADMIN__PASSWORD must not be empty".to_string(),
            ));
        }

        if self.admin.session_ttl_secs <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "admin.session_ttl_secs must be positive".to_string(),
            ));
        }

        if self.store.units.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "store.units must list at least one unit".to_string(),
            ));
        }

        if self.documents.qr_size < 21 {
            return Err(ConfigValidationError::InvalidValue(
                "documents.qr_size must be at least 21 pixels".to_string(),
            ));
        }

        if self.signature.width == 0
            || self.signature.height == 0
            || self.signature.embedded_height == 0
        {
            return Err(ConfigValidationError::InvalidValue(
                "signature surface dimensions cannot be 0".to_string(),
            ));
        }

        let stroke = self.signature.stroke_width;
        if stroke.is_nan() || stroke <= 0.0 {
            return Err(ConfigValidationError::InvalidValue(
                "signature.stroke_width must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Falls back to all interfaces on port 8080 if the host does not parse.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }

    /// Public origin without a trailing slash.
    pub fn public_base_url(&self) -> &str {
        self.documents.public_base_url.trim_end_matches('/')
    }

    pub fn qr_options(&self) -> QrOptions {
        QrOptions {
            size: self.documents.qr_size,
            quiet_zone: self.documents.qr_quiet_zone,
        }
    }

    /// Drawing surface for the full-page pad or the one embedded in the document.
    pub fn signature_surface(&self, embedded: bool) -> SignatureSurface {
        let height = if embedded {
            self.signature.embedded_height
        } else {
            self.signature.height
        };
        SignatureSurface::new(self.signature.width, height, self.signature.stroke_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.signature.width, 400);
        assert_eq!(config.store.units.len(), 8);
        assert!(!config.frontend.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_override() {
        let config = Config::load_for_test(&[
            ("server.port", "9000"),
            ("logging.level", "debug"),
            ("documents.public_base_url", "https://os.example.com/"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.public_base_url(), "https://os.example.com");
    }

    #[test]
    fn test_config_validation_empty_password() {
        let config =
            Config::load_for_test(&[("admin.password", "")]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("OS__ADMIN__PASSWORD"));
    }

    #[test]
    fn test_config_validation_bad_stroke_width() {
        let config = Config::load_for_test(&[("signature.stroke_width", "0")])
            .expect("Failed to load config");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_port() {
        let config =
            Config::load_for_test(&[("server.port", "0")]).expect("Failed to load config");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[
            ("server.host", "127.0.0.1"),
            ("server.port", "3000"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_signature_surface() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");
        let full = config.signature_surface(false);
        let embedded = config.signature_surface(true);
        assert_eq!((full.width, full.height), (400, 200));
        assert_eq!((embedded.width, embedded.height), (400, 150));
        assert_eq!(config.qr_options(), QrOptions { size: 200, quiet_zone: true });
    }
}
