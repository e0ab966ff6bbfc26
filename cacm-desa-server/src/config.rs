//! Command line and environment configuration.
//!
//! Every flag has an environment fallback; a `.env` file is loaded first by
//! the binary.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// CACM Desa red-flag follow-up service
#[derive(Parser, Clone)]
#[command(name = "cacm-desa")]
#[command(about = "Red-flag (atensi) follow-up workflow for village finances")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "10")]
    pub database_max_connections: u32,

    /// HMAC secret for admin session tokens
    #[arg(long, env = "ADMIN_AUTH_SECRET")]
    pub admin_auth_secret: String,

    /// HMAC secret for village session tokens
    #[arg(long, env = "MOBILE_AUTH_SECRET")]
    pub mobile_auth_secret: String,

    #[arg(long, env = "ADMIN_SESSION_HOURS", default_value = "8")]
    pub admin_session_hours: u64,

    #[arg(long, env = "MOBILE_SESSION_HOURS", default_value = "8")]
    pub mobile_session_hours: u64,

    /// User key forwarded to the legacy login procedure
    #[arg(long, env = "ENCRYPT_USER_KEY2")]
    pub encrypt_user_key: String,

    /// Password key forwarded to the legacy login procedure
    #[arg(long, env = "ENCRYPT_PWD_KEY2")]
    pub encrypt_pwd_key: String,

    /// Timeout applied to every stored procedure call
    #[arg(long, env = "PROCEDURE_TIMEOUT_SECS", default_value = "120")]
    pub procedure_timeout_secs: u64,

    /// Mark session cookies `Secure`
    #[arg(long, env = "SECURE_COOKIES", default_value = "false")]
    pub secure_cookies: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Apply the bundled schema scripts at startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "true", action = clap::ArgAction::Set)]
    pub run_migrations: bool,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("listen", &self.listen)
            .field("database_max_connections", &self.database_max_connections)
            .field("admin_session_hours", &self.admin_session_hours)
            .field("mobile_session_hours", &self.mobile_session_hours)
            .field("procedure_timeout_secs", &self.procedure_timeout_secs)
            .field("secure_cookies", &self.secure_cookies)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("run_migrations", &self.run_migrations)
            .finish_non_exhaustive()
    }
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.admin_auth_secret.len() < MIN_SECRET_LEN {
            return Err(format!("ADMIN_AUTH_SECRET must be at least {MIN_SECRET_LEN} characters"));
        }
        if self.mobile_auth_secret.len() < MIN_SECRET_LEN {
            return Err(format!("MOBILE_AUTH_SECRET must be at least {MIN_SECRET_LEN} characters"));
        }
        if self.admin_auth_secret == self.mobile_auth_secret {
            return Err("ADMIN_AUTH_SECRET and MOBILE_AUTH_SECRET must differ".to_string());
        }
        if self.encrypt_user_key.is_empty() || self.encrypt_pwd_key.is_empty() {
            return Err("ENCRYPT_USER_KEY2 and ENCRYPT_PWD_KEY2 are required".to_string());
        }
        if self.admin_session_hours == 0 || self.mobile_session_hours == 0 {
            return Err("session lifetimes must be at least one hour".to_string());
        }
        if self.procedure_timeout_secs == 0 {
            return Err("PROCEDURE_TIMEOUT_SECS must be positive".to_string());
        }
        if self.database_max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be positive".to_string());
        }
        Ok(())
    }

    pub fn procedure_timeout(&self) -> Duration {
        Duration::from_secs(self.procedure_timeout_secs)
    }

    pub fn admin_session_lifetime(&self) -> Duration {
        Duration::from_secs(self.admin_session_hours * 3600)
    }

    pub fn mobile_session_lifetime(&self) -> Duration {
        Duration::from_secs(self.mobile_session_hours * 3600)
    }
}
