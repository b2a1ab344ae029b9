//! CLI helper functions

use crate::{
    client::{Connector, SnowflakeConnector, Statement, Warehouse, WarehouseConfig},
    error::{ErrorKind, RunError},
    etl::{Pipeline, RunReport, RunState},
    publish::Destination,
    roster::{EMPLOYEE_SCHEMA, EmployeeRecord, load_employee_records, roster_extractor},
    transform::roster_transformer,
};
use eyre::{Context, Result};
use std::path::{Path, PathBuf};

/// Everything `publish` needs besides the connection settings
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub workbook: PathBuf,
    pub sheet: String,
    pub destination: Destination,
}

/// Load Snowflake connection settings from environment variables
///
/// See [`WarehouseConfig::from_env`] for the expected variables.
pub fn load_warehouse_config() -> Result<WarehouseConfig> {
    WarehouseConfig::from_env().context("Snowflake connection settings are incomplete")
}

/// Load, normalize and publish the roster
///
/// Pipeline: roster sheet → NameNormalizer → ColumnDropper → RecordProjector → TablePublisher
pub async fn publish_roster(
    settings: &PublishSettings,
    config: WarehouseConfig,
) -> Result<RunReport, RunError> {
    log::info!(
        "Publishing {} (sheet '{}') to table {}",
        settings.workbook.display(),
        settings.sheet,
        settings.destination.table
    );
    log::debug!("Warehouse: {}", config);

    let connector = SnowflakeConnector::try_new(config)
        .map_err(|e| RunError::new(ErrorKind::Connection, RunState::Idle, e))?;
    let pipeline = Pipeline::new(
        roster_extractor(&settings.workbook, &settings.sheet),
        roster_transformer(),
        connector,
        settings.destination.clone(),
    );

    pipeline.run().await
}

/// Load and normalize the roster without publishing it
pub async fn preview_roster(workbook: &Path, sheet: &str) -> Result<Vec<EmployeeRecord>> {
    log::info!("Previewing {} (sheet '{}')", workbook.display(), sheet);
    load_employee_records(workbook, sheet)
        .await
        .with_context(|| format!("Failed to load roster from {}", workbook.display()))
}

/// Render records as an aligned text table, showing at most `limit` rows
pub fn render_table(records: &[EmployeeRecord], limit: Option<usize>) -> String {
    let headers: Vec<String> = EMPLOYEE_SCHEMA.column_names().map(String::from).collect();
    let shown = limit.unwrap_or(records.len()).min(records.len());
    let rows: Vec<Vec<String>> = records[..shown]
        .iter()
        .map(EmployeeRecord::display_values)
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let format_line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(&headers)];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|row| format_line(row)));
    if shown < records.len() {
        lines.push(format!("... {} more row(s)", records.len() - shown));
    }
    lines.join("\n")
}

/// Open and close a warehouse session, returning the server version
pub async fn check_connection(config: WarehouseConfig) -> Result<String> {
    log::info!("Testing connection to {}", config);
    let connector = SnowflakeConnector::try_new(config)?;
    let session = connector.connect().await?;

    let outcome = session
        .execute(&Statement::new("SELECT CURRENT_VERSION()"))
        .await;
    if let Err(err) = session.close().await {
        log::warn!("Failed to close warehouse session: {:#}", err);
    }

    Ok(outcome?
        .scalar()
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str) -> EmployeeRecord {
        EmployeeRecord {
            name: name.to_string(),
            building: Some("A".into()),
            department: Some("Sales".into()),
            status: Some("Active".into()),
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15),
            month: Some("Jan".into()),
            years: Some(4),
            benefits: None,
            salary: Some(55000.0),
        }
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[record("Mary O'Brien")], None);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Employee Name | Building | Department"));
        assert!(lines[1].starts_with("--------------+-"));
        assert!(lines[2].starts_with("Mary O'Brien  | A        | Sales"));
        assert!(lines[2].contains("2020-01-15"));
        assert!(lines[2].ends_with("55000"));
    }

    #[test]
    fn test_render_table_limit() {
        let records = vec![record("A"), record("B"), record("C")];
        let table = render_table(&records, Some(1));

        assert!(table.contains("... 2 more row(s)"));
        assert!(!table.contains("\nB "));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_warehouse_config_missing() {
        unsafe {
            std::env::remove_var("SNOWFLAKE_USER");
        }

        let err = load_warehouse_config().unwrap_err();
        assert!(format!("{:#}", err).contains("SNOWFLAKE_USER"));
    }
}
