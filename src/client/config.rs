//! Warehouse connection settings

use eyre::{Context, Result, eyre};
use std::time::Duration;
use url::Url;

/// Default per-request HTTP timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for a Snowflake account
///
/// Built once at process start and handed to the connector. The seven
/// credential and context settings are required; missing or blank values
/// are reported by name.
#[derive(Clone)]
pub struct WarehouseConfig {
    pub user: String,
    pub password: String,
    pub account: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub role: String,
    /// Base URL override, e.g. for PrivateLink hosts
    pub host: Option<Url>,
    pub timeout: Duration,
}

impl WarehouseConfig {
    pub const USER: &'static str = "SNOWFLAKE_USER";
    pub const PASSWORD: &'static str = "SNOWFLAKE_PASSWORD";
    pub const ACCOUNT: &'static str = "SNOWFLAKE_ACCOUNT";
    pub const WAREHOUSE: &'static str = "SNOWFLAKE_WAREHOUSE";
    pub const DATABASE: &'static str = "SNOWFLAKE_DATABASE";
    pub const SCHEMA: &'static str = "SNOWFLAKE_SCHEMA";
    pub const ROLE: &'static str = "SNOWFLAKE_ROLE";
    pub const HOST: &'static str = "SNOWFLAKE_HOST";
    pub const TIMEOUT_SECS: &'static str = "SNOWFLAKE_TIMEOUT_SECS";

    /// Load settings from environment variables
    ///
    /// Expected environment variables:
    /// - SNOWFLAKE_USER, SNOWFLAKE_PASSWORD: login credentials (required)
    /// - SNOWFLAKE_ACCOUNT: account identifier, e.g. `xy12345.us-east-1` (required)
    /// - SNOWFLAKE_WAREHOUSE, SNOWFLAKE_DATABASE, SNOWFLAKE_SCHEMA, SNOWFLAKE_ROLE:
    ///   session context (required)
    /// - SNOWFLAKE_HOST: base URL override (optional)
    /// - SNOWFLAKE_TIMEOUT_SECS: HTTP request timeout (optional, default 60)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let verbatim = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| eyre!("{} environment variable not set", key))
        };
        let required = |key: &str| verbatim(key).map(|value| value.trim().to_string());

        let host = match lookup(Self::HOST).filter(|h| !h.trim().is_empty()) {
            Some(host) => Some(
                Url::parse(host.trim())
                    .with_context(|| format!("Invalid {}: {}", Self::HOST, host))?,
            ),
            None => None,
        };

        let timeout = match lookup(Self::TIMEOUT_SECS).filter(|t| !t.trim().is_empty()) {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("Invalid {}: {}", Self::TIMEOUT_SECS, secs))?,
            ),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            user: required(Self::USER)?,
            password: verbatim(Self::PASSWORD)?,
            account: required(Self::ACCOUNT)?,
            warehouse: required(Self::WAREHOUSE)?,
            database: required(Self::DATABASE)?,
            schema: required(Self::SCHEMA)?,
            role: required(Self::ROLE)?,
            host,
            timeout,
        })
    }

    /// Account name without region or cloud suffix (`xy12345.us-east-1` -> `xy12345`)
    pub fn account_name(&self) -> &str {
        self.account.split('.').next().unwrap_or(&self.account)
    }

    /// Base URL of the account's API endpoint
    pub fn base_url(&self) -> Result<Url> {
        match &self.host {
            Some(host) => Ok(host.clone()),
            None => {
                let url = format!("https://{}.snowflakecomputing.com", self.account);
                Url::parse(&url).with_context(|| format!("Invalid {}: {}", Self::ACCOUNT, self.account))
            }
        }
    }
}

impl std::fmt::Debug for WarehouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field("user", &self.user)
            .field("password", &"********")
            .field("account", &self.account)
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("role", &self.role)
            .field("host", &self.host.as_ref().map(Url::as_str))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl std::fmt::Display for WarehouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{} ({}.{}, warehouse {}, role {})",
            self.user, self.account, self.database, self.schema, self.warehouse, self.role
        )
    }
}
