use clap::{Parser, Subcommand, builder::styling};
use owo_colors::OwoColorize;
use roster_publisher::{
    cli::{
        PublishSettings, check_connection, load_warehouse_config, preview_roster, publish_roster,
        render_table,
    },
    error::{ErrorKind, RunError},
    etl::RunState,
    publish::{DEFAULT_BATCH_SIZE, Destination, WritePolicy},
    roster::{DEFAULT_SHEET, DEFAULT_TABLE, DEFAULT_WORKBOOK},
};
use std::{path::PathBuf, process::ExitCode};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Roster Publisher: clean an employee roster spreadsheet and publish it to Snowflake
#[derive(Parser)]
#[command(name = "roster", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source Snowflake credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the roster, normalize names, drop derived columns and publish to Snowflake
    Publish {
        /// The roster workbook to read
        #[arg(default_value = DEFAULT_WORKBOOK)]
        workbook: PathBuf,

        /// Worksheet holding the roster
        #[arg(short, long, default_value = DEFAULT_SHEET)]
        sheet: String,

        /// Destination table
        #[arg(short, long, default_value = DEFAULT_TABLE)]
        table: String,

        /// Replace the table contents or append to them
        #[arg(short, long, value_enum, default_value_t = WritePolicy::Replace)]
        policy: WritePolicy,

        /// Rows per INSERT statement
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Print the cleaned roster without connecting to Snowflake
    Preview {
        /// The roster workbook to read
        #[arg(default_value = DEFAULT_WORKBOOK)]
        workbook: PathBuf,

        /// Worksheet holding the roster
        #[arg(short, long, default_value = DEFAULT_SHEET)]
        sheet: String,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Test the Snowflake credentials by opening and closing a session
    Check,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dotenv = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {
            log::debug!("No {} file found, using the process environment", cli.env)
        }
        Err(err) => {
            let err = RunError::new(
                ErrorKind::Connection,
                RunState::Idle,
                eyre::Report::new(err).wrap_err(format!("Failed to read {}", cli.env)),
            );
            return report_failure(&err);
        }
    }

    match cli.command {
        Commands::Publish {
            workbook,
            sheet,
            table,
            policy,
            batch_size,
        } => {
            let settings = PublishSettings {
                workbook,
                sheet,
                destination: Destination::new(table)
                    .with_policy(policy)
                    .with_batch_size(batch_size),
            };
            let config = match load_warehouse_config() {
                Ok(config) => config,
                Err(err) => {
                    return report_failure(&RunError::new(
                        ErrorKind::Connection,
                        RunState::Idle,
                        err,
                    ));
                }
            };

            match publish_roster(&settings, config).await {
                Ok(report) => {
                    log::info!(
                        "✓ Published {} of {} row(s) to {} ({})",
                        report.published,
                        report.extracted,
                        settings.destination.table.bright_black(),
                        settings.destination.policy
                    );
                    println!("{}", "Data successfully inserted into Snowflake.".green());
                    ExitCode::SUCCESS
                }
                Err(err) => report_failure(&err),
            }
        }
        Commands::Preview {
            workbook,
            sheet,
            limit,
        } => match preview_roster(&workbook, &sheet).await {
            Ok(records) => {
                log::info!("✓ Loaded {} record(s)", records.len());
                println!("{}", render_table(&records, limit));
                ExitCode::SUCCESS
            }
            Err(err) => report_failure(&RunError::new(ErrorKind::Input, RunState::Loading, err)),
        },
        Commands::Check => {
            let result = match load_warehouse_config() {
                Ok(config) => check_connection(config).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(version) => {
                    println!("{} Snowflake {}", "✓ Connected to".green(), version);
                    ExitCode::SUCCESS
                }
                Err(err) => report_failure(&RunError::new(
                    ErrorKind::Connection,
                    RunState::Connecting,
                    err,
                )),
            }
        }
    }
}

fn report_failure(err: &RunError) -> ExitCode {
    log::debug!("{:?}", err.report());
    log::error!("{} while {}", err.kind(), err.state());
    eprintln!("{}", err.diagnostic().red());
    ExitCode::from(err.kind().exit_code())
}
