use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 crate defaults (OWASP minimum for Argon2id)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                or("DB_USER", "postgres"),
                or("DB_PASSWORD", "postgres"),
                or("DB_HOST", "localhost"),
                or("DB_PORT", "5432"),
                or("DB_NAME", "marketplace"),
            ),
        };

        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .context("JWT_SECRET is required")?;

        let jwt = JwtConfig {
            secret,
            issuer: or("JWT_ISSUER", "marketplace"),
            audience: or("JWT_AUDIENCE", "marketplace-users"),
        };

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations),
            parallelism: parse_or(&lookup, "PASSWORD_HASH_PARALLELISM", defaults.parallelism),
        };

        let server = ServerConfig {
            host: or("APP_HOST", "0.0.0.0"),
            port: parse_or(&lookup, "APP_PORT", 8080),
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10),
            jwt,
            password,
            server,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
