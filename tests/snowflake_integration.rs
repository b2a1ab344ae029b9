//! Integration tests for the Snowflake session client
//!
//! A wiremock server stands in for the account endpoint.

use eyre::Result;
use roster_publisher::client::{
    BindType, Binding, Connector, QueryError, SnowflakeConnector, Statement, Warehouse,
    WarehouseConfig,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "session-token";

fn config(server: &MockServer) -> WarehouseConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        (WarehouseConfig::USER, "loader".to_string()),
        (WarehouseConfig::PASSWORD, "hunter2".to_string()),
        (WarehouseConfig::ACCOUNT, "xy12345.us-east-1".to_string()),
        (WarehouseConfig::WAREHOUSE, "COMPUTE_WH".to_string()),
        (WarehouseConfig::DATABASE, "HR".to_string()),
        (WarehouseConfig::SCHEMA, "PUBLIC".to_string()),
        (WarehouseConfig::ROLE, "LOADER".to_string()),
        (WarehouseConfig::HOST, server.uri()),
    ]);
    WarehouseConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "code": null,
        "message": null,
        "data": data
    }))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session/v1/login-request"))
        .and(query_param("warehouse", "COMPUTE_WH"))
        .and(query_param("databaseName", "HR"))
        .and(query_param("schemaName", "PUBLIC"))
        .and(query_param("roleName", "LOADER"))
        .and(body_partial_json(json!({
            "data": {
                "ACCOUNT_NAME": "xy12345",
                "LOGIN_NAME": "loader",
                "PASSWORD": "hunter2"
            }
        })))
        .respond_with(ok(json!({ "token": TOKEN, "sessionId": 42 })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_logout(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .and(query_param("delete", "true"))
        .and(header("authorization", "Snowflake Token=\"session-token\""))
        .respond_with(ok(Value::Null))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_query_and_close() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_logout(&server).await;
    Mock::given(method("POST"))
        .and(path("/queries/v1/query-request"))
        .and(header("authorization", "Snowflake Token=\"session-token\""))
        .and(body_partial_json(json!({ "sqlText": "SELECT CURRENT_VERSION()" })))
        .respond_with(ok(json!({
            "queryId": "01a2",
            "rowtype": [{ "name": "CURRENT_VERSION()" }],
            "rowset": [["8.40.1"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = SnowflakeConnector::try_new(config(&server))?;
    let session = connector.connect().await?;
    let outcome = session
        .execute(&Statement::new("SELECT CURRENT_VERSION()"))
        .await?;
    session.close().await?;
    // Closing twice sends nothing
    session.close().await?;

    assert_eq!(outcome.query_id.as_deref(), Some("01a2"));
    assert_eq!(outcome.columns, vec!["CURRENT_VERSION()"]);
    assert_eq!(outcome.scalar(), Some("8.40.1"));
    Ok(())
}

#[tokio::test]
async fn test_rejected_login() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/v1/login-request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": "390100",
            "message": "Incorrect username or password was specified.",
            "data": null
        })))
        .mount(&server)
        .await;

    let connector = SnowflakeConnector::try_new(config(&server))?;
    let err = connector.connect().await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Snowflake login failed"));
    assert!(message.contains("Incorrect username or password"));
    assert!(message.contains("390100"));
    Ok(())
}

#[tokio::test]
async fn test_http_error_on_login() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/v1/login-request"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let connector = SnowflakeConnector::try_new(config(&server))?;
    let err = connector.connect().await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("503"));
    assert!(message.contains("maintenance"));
    Ok(())
}

#[tokio::test]
async fn test_query_error_is_typed() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_logout(&server).await;
    Mock::given(method("POST"))
        .and(path("/queries/v1/query-request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": "002003",
            "message": "SQL compilation error: Table 'MISSING' does not exist",
            "data": { "queryId": "01a3", "sqlState": "42S02" }
        })))
        .mount(&server)
        .await;

    let connector = SnowflakeConnector::try_new(config(&server))?;
    let session = connector.connect().await?;
    let err = session
        .execute(&Statement::new("SELECT * FROM MISSING"))
        .await
        .unwrap_err();
    session.close().await?;

    let query = err.downcast_ref::<QueryError>().unwrap();
    assert_eq!(query.code, "002003");
    assert_eq!(query.sql_state.as_deref(), Some("42S02"));
    assert_eq!(query.query_id.as_deref(), Some("01a3"));
    assert!(query.message.contains("does not exist"));
    Ok(())
}

#[tokio::test]
async fn test_long_running_query_is_polled() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_logout(&server).await;
    Mock::given(method("POST"))
        .and(path("/queries/v1/query-request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": "333334",
            "message": "Asynchronous execution in progress.",
            "data": { "queryId": "01a4", "getResultUrl": "/queries/01a4/result" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/queries/01a4/result"))
        .and(header("authorization", "Snowflake Token=\"session-token\""))
        .respond_with(ok(json!({
            "queryId": "01a4",
            "rowtype": [{ "name": "number of rows inserted" }],
            "rowset": [["2"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = SnowflakeConnector::try_new(config(&server))?;
    let session = connector.connect().await?;
    let outcome = session
        .execute(&Statement::new("INSERT INTO t SELECT 1 UNION SELECT 2"))
        .await?;
    session.close().await?;

    assert_eq!(outcome.rows_affected(), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_bindings_are_sent_by_position() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_logout(&server).await;
    Mock::given(method("POST"))
        .and(path("/queries/v1/query-request"))
        .and(body_string_contains("INSERT INTO"))
        .and(body_partial_json(json!({
            "bindings": {
                "1": { "type": "TEXT", "value": ["Ann", null] },
                "2": { "type": "FIXED", "value": ["3", "4"] }
            }
        })))
        .respond_with(ok(json!({
            "rowtype": [{ "name": "number of rows inserted" }],
            "rowset": [["2"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let statement = Statement::with_bindings(
        "INSERT INTO t (a, b) VALUES (?, ?)",
        vec![
            Binding {
                kind: BindType::Text,
                values: vec![Some("Ann".to_string()), None],
            },
            Binding {
                kind: BindType::Fixed,
                values: vec![Some("3".to_string()), Some("4".to_string())],
            },
        ],
    );

    let connector = SnowflakeConnector::try_new(config(&server))?;
    let session = connector.connect().await?;
    let outcome = session.execute(&statement).await?;
    session.close().await?;

    assert_eq!(outcome.rows_affected(), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_closed_session_refuses_queries() -> Result<()> {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_logout(&server).await;

    let connector = SnowflakeConnector::try_new(config(&server))?;
    let session = connector.connect().await?;
    session.close().await?;

    let err = session
        .execute(&Statement::new("SELECT 1"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already closed"));
    Ok(())
}
