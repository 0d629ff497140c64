use std::env;

/// Fallback signing secret for local runs. Never accepted in production.
pub const LOCAL_JWT_SECRET: &str = "local-development-signing-secret";

/// Credentials live for one day unless `TOKEN_TTL_SECS` says otherwise.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Longest accepted credential lifetime: one year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 86_400;

/// AppConfig
///
/// Process-wide configuration, loaded once at startup and shared read-only
/// through the application state (`FromRef`).
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` in local mode selects the in-memory store.
    pub db_url: Option<String>,
    // Runtime environment marker. Selects log format and secret strictness.
    pub env: Env,
    // HMAC secret used to sign and verify credentials.
    pub jwt_secret: String,
    // Lifetime of issued credentials, in seconds.
    pub token_ttl_secs: i64,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Load the ten demo listings into the in-memory store at startup.
    pub seed_demo: bool,
    // bcrypt work factor for password hashes.
    pub password_hash_cost: u32,
}

/// Env
///
/// Runtime context: `Local` allows fallbacks, `Production` demands every secret.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Test-safe configuration that needs no environment variables.
    fn default() -> Self {
        Self {
            db_url: None,
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bind_addr: "0.0.0.0:5000".to_string(),
            seed_demo: false,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the environment and fails fast.
    ///
    /// # Panics
    /// Panics in production when `JWT_SECRET` or `DATABASE_URL` is missing, and
    /// in any environment when `TOKEN_TTL_SECS` is not an integer in
    /// `1..=MAX_TOKEN_TTL_SECS`.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            Env::Local => env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
        };

        let db_url = match env {
            Env::Production => Some(
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in production"),
            ),
            Env::Local => env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
        };

        let token_ttl_secs = match env::var("TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=MAX_TOKEN_TTL_SECS).contains(ttl))
                .expect("FATAL: TOKEN_TTL_SECS must be between 1 and 31536000 (one year)"),
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        Self {
            db_url,
            env,
            jwt_secret,
            token_ttl_secs,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            seed_demo: matches!(env::var("SEED_DEMO").as_deref(), Ok("1") | Ok("true")),
            password_hash_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        }
    }
}
