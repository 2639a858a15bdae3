use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub analysis: AnalysisConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expires_in: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Upstream completion endpoint configuration (loaded from conf/config.toml)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the chat-completions API
    pub api_base: String,
    /// Bearer token for the upstream API (usually set via APP_ANALYSIS_API_KEY)
    pub api_key: String,
    /// Referer URL sent with each request
    pub site_url: String,
    /// Hard wall-clock timeout for one analysis call (default: 25)
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
    /// Completion budget per analysis (default: 2000)
    pub max_tokens: u32,
    /// Sampling temperature (default: 0.7)
    pub temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Shared secret expected in the webhook signature header
    pub webhook_secret: String,
    /// Credits granted when a subscription becomes active
    pub plan_credits: i64,
    /// Credits granted to a newly registered account
    pub signup_credits: i64,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from config.toml file
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load() -> Result<Self, anyhow::Error> {
        // 1. Load from config file
        let mut config = if let Some(config_path) = Self::find_config_file() {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        // 2. Override with environment variables
        config.apply_env_overrides();

        // 3. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_DATABASE_URL: Database URL (default: sqlite://data/contract-lens.db)
    /// - APP_JWT_SECRET: JWT secret key
    /// - APP_JWT_EXPIRES_IN: JWT expiration time (e.g., "24h")
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,contract_lens=debug")
    /// - APP_ANALYSIS_API_BASE: Chat-completions endpoint base URL
    /// - APP_ANALYSIS_API_KEY: Bearer token for the upstream API
    /// - APP_ANALYSIS_SITE_URL: Referer URL sent with each upstream request
    /// - APP_ANALYSIS_TIMEOUT_SECS: Analysis call timeout (accepts "25s", "1m")
    /// - APP_BILLING_WEBHOOK_SECRET: Shared secret for the billing webhook
    /// - APP_BILLING_PLAN_CREDITS: Credits granted per active subscription
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(db_url) = std::env::var("APP_DATABASE_URL") {
            self.database.url = db_url;
            tracing::info!("Override database.url from env");
        }

        if let Ok(secret) = std::env::var("APP_JWT_SECRET") {
            self.auth.jwt_secret = secret;
            tracing::info!("Override auth.jwt_secret from env");
        }

        if let Ok(expires) = std::env::var("APP_JWT_EXPIRES_IN") {
            self.auth.jwt_expires_in = expires;
            tracing::info!("Override auth.jwt_expires_in from env: {}", self.auth.jwt_expires_in);
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(api_base) = std::env::var("APP_ANALYSIS_API_BASE") {
            self.analysis.api_base = api_base;
            tracing::info!("Override analysis.api_base from env: {}", self.analysis.api_base);
        }

        if let Ok(api_key) = std::env::var("APP_ANALYSIS_API_KEY") {
            self.analysis.api_key = api_key;
            tracing::info!("Override analysis.api_key from env");
        }

        if let Ok(site_url) = std::env::var("APP_ANALYSIS_SITE_URL") {
            self.analysis.site_url = site_url;
            tracing::info!("Override analysis.site_url from env: {}", self.analysis.site_url);
        }

        if let Ok(timeout) = std::env::var("APP_ANALYSIS_TIMEOUT_SECS") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.analysis.timeout_secs = val;
                    tracing::info!(
                        "Override analysis.timeout_secs from env: {}",
                        self.analysis.timeout_secs
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_ANALYSIS_TIMEOUT_SECS '{}': {} (keep {})",
                    timeout,
                    e,
                    self.analysis.timeout_secs
                ),
            }
        }

        if let Ok(secret) = std::env::var("APP_BILLING_WEBHOOK_SECRET") {
            self.billing.webhook_secret = secret;
            tracing::info!("Override billing.webhook_secret from env");
        }

        if let Ok(credits) = std::env::var("APP_BILLING_PLAN_CREDITS")
            && let Ok(credits) = credits.parse()
        {
            self.billing.plan_credits = credits;
            tracing::info!("Override billing.plan_credits from env: {}", self.billing.plan_credits);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        // Warn if using default JWT secret in production
        if self.auth.jwt_secret == "dev-secret-key-change-in-production" {
            tracing::warn!("⚠️  WARNING: Using default JWT secret!");
            tracing::warn!(
                "⚠️  Please set APP_JWT_SECRET environment variable or update config.toml"
            );
            tracing::warn!("⚠️  This is INSECURE for production use!");
        }

        if self.analysis.api_key.is_empty() {
            tracing::warn!(
                "analysis.api_key is empty; analysis calls will be rejected by the upstream API"
            );
        }

        // Validate server port
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        // Validate database URL
        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.analysis.timeout_secs == 0 {
            anyhow::bail!("analysis.timeout_secs must be > 0");
        }
        if self.analysis.max_tokens == 0 {
            anyhow::bail!("analysis.max_tokens must be > 0");
        }
        if self.billing.plan_credits < 0 || self.billing.signup_credits < 0 {
            anyhow::bail!("billing credit grants cannot be negative");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: "sqlite://data/contract-lens.db".to_string() }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret-key-change-in-production".to_string(),
            jwt_expires_in: "24h".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,contract_lens=debug".to_string(),
            file: Some("logs/contract-lens.log".to_string()),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            api_key: String::new(),
            site_url: "https://contract-lens.app".to_string(),
            timeout_secs: 25,
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self { webhook_secret: String::new(), plan_credits: 50, signup_credits: 3 }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(n * 60),
        "h" | "hr" | "hour" | "hours" => Ok(n * 60 * 60),
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Custom serde deserializer to support numeric or human-friendly string values
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '25s', '1m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
        fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(&v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}
