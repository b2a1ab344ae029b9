//! Snowflake session client
//!
//! Speaks the JSON session protocol the Snowflake connectors use:
//! `POST /session/v1/login-request` to authenticate,
//! `POST /queries/v1/query-request` to run statements, and
//! `POST /session?delete=true` to end the session.

use super::{Connector, QueryError, QueryOutcome, Statement, Warehouse, WarehouseConfig};
use eyre::{Context, Result, eyre};
use reqwest::{Client, Response, header};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

const CLIENT_APP_ID: &str = "roster-publisher";

/// Response codes for a query that is still running
const QUERY_IN_PROGRESS: [&str; 2] = ["333333", "333334"];

const FIRST_POLL_DELAY: Duration = Duration::from_millis(250);
const MAX_POLL_DELAY: Duration = Duration::from_secs(5);

/// Common response wrapper of every Snowflake endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

impl Envelope {
    fn in_progress(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| QUERY_IN_PROGRESS.contains(&code))
    }

    fn describe(&self) -> String {
        format!(
            "{} ({})",
            self.message.as_deref().unwrap_or("no message"),
            self.code.as_deref().unwrap_or("no code")
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    token: String,
    #[serde(default)]
    session_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    query_id: Option<String>,
    sql_state: Option<String>,
    #[serde(default)]
    rowtype: Vec<RowType>,
    #[serde(default)]
    rowset: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct RowType {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    sql_text: &'a str,
    sequence_id: u64,
    async_exec: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bindings: Option<std::collections::BTreeMap<String, &'a super::Binding>>,
}

/// Check the HTTP status and decode the JSON envelope
async fn read_envelope(response: Response) -> Result<Envelope> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        eyre::bail!("Snowflake request failed ({}): {}", status, body);
    }
    response
        .json::<Envelope>()
        .await
        .context("Failed to parse Snowflake response")
}

/// Opens [`SnowflakeSession`]s for one account
///
/// # Example
/// ```no_run
/// use roster_publisher::client::{Connector, SnowflakeConnector, Statement, Warehouse, WarehouseConfig};
///
/// # async fn example() -> eyre::Result<()> {
/// let connector = SnowflakeConnector::try_new(WarehouseConfig::from_env()?)?;
/// let session = connector.connect().await?;
/// let outcome = session.execute(&Statement::new("SELECT CURRENT_VERSION()")).await;
/// session.close().await?;
/// println!("{:?}", outcome?.scalar());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SnowflakeConnector {
    client: Client,
    base_url: Url,
    config: WarehouseConfig,
}

impl SnowflakeConnector {
    /// Create a connector from connection settings
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the account
    /// does not form a valid URL.
    pub fn try_new(config: WarehouseConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, "application/json".parse()?);
        let client = Client::builder()
            .default_headers(headers)
            .user_agent(format!("{}/{}", CLIENT_APP_ID, env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = config.base_url()?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn login_url(&self) -> Result<Url> {
        let mut url = self.base_url.join("session/v1/login-request")?;
        url.query_pairs_mut()
            .append_pair("warehouse", &self.config.warehouse)
            .append_pair("databaseName", &self.config.database)
            .append_pair("schemaName", &self.config.schema)
            .append_pair("roleName", &self.config.role)
            .append_pair("request_id", &Uuid::new_v4().to_string());
        Ok(url)
    }
}

impl Connector for SnowflakeConnector {
    type Session = SnowflakeSession;

    async fn connect(&self) -> Result<SnowflakeSession> {
        let body = json!({
            "data": {
                "CLIENT_APP_ID": CLIENT_APP_ID,
                "CLIENT_APP_VERSION": env!("CARGO_PKG_VERSION"),
                "ACCOUNT_NAME": self.config.account_name(),
                "LOGIN_NAME": self.config.user,
                "PASSWORD": self.config.password,
                "SESSION_PARAMETERS": { "AUTOCOMMIT": true }
            }
        });

        log::debug!("Logging in to {} as {}", self.base_url, self.config.user);
        let response = self
            .client
            .post(self.login_url()?)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach Snowflake at {}", self.base_url))?;
        let envelope = read_envelope(response).await?;

        if !envelope.success {
            eyre::bail!("Snowflake login failed: {}", envelope.describe());
        }

        let data: LoginData = serde_json::from_value(envelope.data)
            .context("Unexpected login response from Snowflake")?;
        log::info!(
            "Connected to Snowflake as {} (session {})",
            self.config.user,
            data.session_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        Ok(SnowflakeSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: data.token,
            sequence: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }
}

/// An authenticated Snowflake session
///
/// Close it with [`Warehouse::close`]; dropping an open session only logs a
/// warning because the logout request cannot be sent from `Drop`.
pub struct SnowflakeSession {
    client: Client,
    base_url: Url,
    token: String,
    sequence: AtomicU64,
    closed: AtomicBool,
}

impl SnowflakeSession {
    fn authorization(&self) -> String {
        format!("Snowflake Token=\"{}\"", self.token)
    }

    async fn submit(&self, statement: &Statement) -> Result<Envelope> {
        let mut url = self.base_url.join("queries/v1/query-request")?;
        url.query_pairs_mut()
            .append_pair("requestId", &Uuid::new_v4().to_string());

        let request = QueryRequest {
            sql_text: &statement.sql,
            sequence_id: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            async_exec: false,
            bindings: statement.wire_bindings(),
        };

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, self.authorization())
            .json(&request)
            .send()
            .await
            .context("Failed to send query to Snowflake")?;
        read_envelope(response).await
    }

    async fn fetch_result(&self, result_url: &str) -> Result<Envelope> {
        let url = self.base_url.join(result_url)?;
        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .context("Failed to poll Snowflake query result")?;
        read_envelope(response).await
    }
}

/// Turn a completed query envelope into an outcome or a [`QueryError`]
fn into_outcome(envelope: Envelope) -> Result<QueryOutcome> {
    let data: QueryData = match envelope.data {
        Value::Null => QueryData::default(),
        data => serde_json::from_value(data).context("Unexpected query response from Snowflake")?,
    };

    if !envelope.success {
        return Err(QueryError {
            code: envelope.code.unwrap_or_else(|| "unknown".to_string()),
            message: envelope
                .message
                .unwrap_or_else(|| "query failed without a message".to_string()),
            sql_state: data.sql_state,
            query_id: data.query_id,
        }
        .into());
    }

    Ok(QueryOutcome {
        query_id: data.query_id,
        columns: data.rowtype.into_iter().map(|column| column.name).collect(),
        rows: data.rowset,
    })
}

impl Warehouse for SnowflakeSession {
    async fn execute(&self, statement: &Statement) -> Result<QueryOutcome> {
        if self.closed.load(Ordering::SeqCst) {
            eyre::bail!("Snowflake session is already closed");
        }

        log::debug!("Executing: {}", statement);
        let mut envelope = self.submit(statement).await?;

        let mut delay = FIRST_POLL_DELAY;
        while envelope.in_progress() {
            let result_url = envelope
                .data
                .get("getResultUrl")
                .and_then(Value::as_str)
                .ok_or_else(|| eyre!("Snowflake reported a running query without a result URL"))?
                .to_string();
            log::trace!("Query still running, polling {} in {:?}", result_url, delay);
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(MAX_POLL_DELAY);
            envelope = self.fetch_result(&result_url).await?;
        }

        let outcome = into_outcome(envelope)?;
        log::trace!("Query {:?} completed", outcome.query_id);
        Ok(outcome)
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut url = self.base_url.join("session")?;
        url.query_pairs_mut().append_pair("delete", "true");
        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, self.authorization())
            .send()
            .await
            .context("Failed to close Snowflake session")?;
        let envelope = read_envelope(response).await?;

        if !envelope.success {
            eyre::bail!("Snowflake rejected logout: {}", envelope.describe());
        }
        log::debug!("Snowflake session closed");
        Ok(())
    }
}

impl Drop for SnowflakeSession {
    fn drop(&mut self) {
        if !*self.closed.get_mut() {
            log::warn!("Snowflake session dropped without being closed");
        }
    }
}

impl std::fmt::Debug for SnowflakeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeSession")
            .field("base_url", &self.base_url.as_str())
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
