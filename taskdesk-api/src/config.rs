/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `JWT_ACCESS_SECRET`: Secret key for access token signing (required)
/// - `JWT_REFRESH_SECRET`: Secret key for refresh token signing (required)
/// - `JWT_ACCESS_TTL`: Access token lifetime, e.g. `15m` (default: 15m)
/// - `JWT_REFRESH_TTL`: Refresh token lifetime, e.g. `7d` (default: 7d)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use taskdesk_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` enables the permissive layer)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for access token signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub access_secret: String,

    /// Secret key for refresh token signing, distinct from the access secret
    pub refresh_secret: String,

    /// Access token lifetime in seconds
    pub access_ttl_seconds: i64,

    /// Refresh token lifetime in seconds
    pub refresh_ttl_seconds: i64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    /// - A TTL string is malformed (fail fast, not at request time)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use taskdesk_api::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let access_secret = env::var("JWT_ACCESS_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_ACCESS_SECRET environment variable is required"))?;
        let refresh_secret = env::var("JWT_REFRESH_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET environment variable is required"))?;

        if access_secret.len() < 32 {
            anyhow::bail!("JWT_ACCESS_SECRET must be at least 32 characters long");
        }
        if refresh_secret.len() < 32 {
            anyhow::bail!("JWT_REFRESH_SECRET must be at least 32 characters long");
        }
        if access_secret == refresh_secret {
            anyhow::bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
        }

        let access_ttl_seconds =
            parse_ttl(&env::var("JWT_ACCESS_TTL").unwrap_or_else(|_| "15m".to_string()))?;
        let refresh_ttl_seconds =
            parse_ttl(&env::var("JWT_REFRESH_TTL").unwrap_or_else(|_| "7d".to_string()))?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_ttl_seconds,
                refresh_ttl_seconds,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Parses a TTL string of the form `<integer><unit>` into seconds
///
/// Accepted units are `s` (seconds), `m` (minutes), `h` (hours) and
/// `d` (days), case-insensitive, with optional whitespace between number
/// and unit. A bare integer is interpreted as seconds.
///
/// # Example
///
/// ```
/// use taskdesk_api::config::parse_ttl;
///
/// assert_eq!(parse_ttl("15m").unwrap(), 900);
/// assert_eq!(parse_ttl("7d").unwrap(), 604_800);
/// assert_eq!(parse_ttl("900").unwrap(), 900);
/// ```
pub fn parse_ttl(raw: &str) -> anyhow::Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        anyhow::bail!("TTL must not be empty");
    }

    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    if digits.is_empty() {
        anyhow::bail!("TTL '{}' must start with a number", raw);
    }

    let value: i64 = digits.parse()?;
    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        other => anyhow::bail!("Unknown TTL unit '{}' (expected s, m, h or d)", other),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("TTL '{}' does not fit in seconds", raw))
}
