use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

/// Signing key used when ADMIN_SESSION_SECRET is unset outside production.
pub const DEV_SESSION_SECRET: &str = "dev-secret-change-me";

/// Admin credentials for the password-gated panel.
///
/// Built once from the environment and handed to the web layer explicitly;
/// the request gate never reads the environment itself.
#[derive(Clone)]
pub struct AuthConfig {
    /// ADMIN_PASSWORD. `None` (unset or empty) means admin login is
    /// unconfigured and every gated request is refused.
    pub admin_password: Option<String>,
    /// ADMIN_SESSION_SECRET: HMAC key for session tokens.
    pub session_secret: String,
    /// ADMIN_COOKIE_SECURE: add the `Secure` attribute to the session cookie.
    pub secure_cookie: bool,
}

impl AuthConfig {
    /// Read admin credentials from environment variables.
    ///
    /// Fails when BLACKINK_ENV=production and no signing secret is set, so the
    /// development fallback key can never sign production sessions.
    pub fn from_env() -> Result<Self> {
        let production = env::var("BLACKINK_ENV").as_deref() == Ok("production");

        let session_secret = match env::var("ADMIN_SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if production => anyhow::bail!(
                "ADMIN_SESSION_SECRET not set. It is required when BLACKINK_ENV=production."
            ),
            _ => {
                warn!("ADMIN_SESSION_SECRET not set; using the development signing key");
                DEV_SESSION_SECRET.to_string()
            }
        };

        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty());
        if admin_password.is_none() {
            warn!("ADMIN_PASSWORD not set; admin login is disabled");
        }

        Ok(Self {
            admin_password,
            session_secret,
            secure_cookie: matches!(
                env::var("ADMIN_COOKIE_SECURE").as_deref(),
                Ok("1") | Ok("true")
            ),
        })
    }

    /// Credentials for tests and tooling.
    pub fn new(admin_password: Option<&str>, session_secret: &str) -> Self {
        Self {
            admin_password: admin_password.map(str::to_string),
            session_secret: session_secret.to_string(),
            secure_cookie: false,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.admin_password.is_some()
    }
}

// Hand-written so the password and secret never reach logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("session_secret", &"<redacted>")
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Directory served as the site root (pages, images, uploads).
    pub public_dir: PathBuf,
    /// Where admin image uploads are written; served under /uploads.
    pub uploads_dir: PathBuf,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let public_dir = env::var("BLACKINK_PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public"));
        let uploads_dir = env::var("BLACKINK_UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| public_dir.join("uploads"));

        Ok(Self {
            db_path: env::var("BLACKINK_DB_PATH").unwrap_or_else(|_| "./blackink.db".to_string()),
            public_dir,
            uploads_dir,
            auth: AuthConfig::from_env()?,
        })
    }
}
