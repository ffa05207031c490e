pub mod commands;

use clap::{Args, Parser, Subcommand};
use leavegate_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "leavegate",
    about = "Leavegate operator CLI",
    long_about = "Prepare the leave database and run auto-approval decisions against it.",
    after_help = "Examples:\n  leavegate migrate\n  leavegate seed\n  leavegate evaluate --request-id lr-seed-001\n  leavegate evaluate --request-id adhoc --user-id usr-bob-001 --start 2026-11-02 --end 2026-11-03\n  leavegate rules"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    #[arg(long, global = true, value_name = "PATH", help = "Config file; must exist when given")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override database.url")]
    database_url: Option<String>,
    #[arg(long, global = true, help = "Override logging.level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Override logging.format (compact|pretty|json)")]
    log_format: Option<LogFormat>,
}

impl GlobalArgs {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                database_url: self.database_url.clone(),
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic bootstrap dataset and verify it")]
    Seed,
    #[command(
        about = "Evaluate a leave request; stored by id, or ad hoc with --user-id/--start/--end"
    )]
    Evaluate {
        #[arg(long, help = "Leave request identifier")]
        request_id: String,
        #[arg(
            long,
            requires_all = ["start", "end"],
            help = "Requesting user for ad hoc evaluation"
        )]
        user_id: Option<String>,
        #[arg(long, requires_all = ["user_id", "end"], help = "First day of leave (YYYY-MM-DD)")]
        start: Option<String>,
        #[arg(long, requires_all = ["user_id", "start"], help = "Last day of leave (YYYY-MM-DD)")]
        end: Option<String>,
    },
    #[command(about = "List active approval rules, highest priority first")]
    Rules,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = cli.global.load_options();

    // A broken config is reported by the command itself.
    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config.logging);
    }

    let command_name = cli.command.name();
    let result = match cli.command {
        Command::Migrate => commands::migrate::run(options),
        Command::Seed => commands::seed::run(options),
        Command::Evaluate { request_id, user_id, start, end } => commands::evaluate::run(
            options,
            commands::evaluate::EvaluateArgs { request_id, user_id, start, end },
        ),
        Command::Rules => commands::rules::run(options),
    };

    tracing::info!(
        event_name = "system.cli.command_completed",
        command = command_name,
        exit_code = result.exit_code,
        "cli command completed"
    );
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Migrate => "migrate",
            Self::Seed => "seed",
            Self::Evaluate { .. } => "evaluate",
            Self::Rules => "rules",
        }
    }
}

/// Logs go to stderr so stdout carries only the command payload.
fn init_logging(logging: &LoggingConfig) {
    use leavegate_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    let _ = match logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use leavegate_core::config::LogFormat;

    use super::{Cli, Command};

    #[test]
    fn global_flags_become_load_options() {
        let cli = Cli::try_parse_from([
            "leavegate",
            "rules",
            "--config",
            "ops/leavegate.toml",
            "--database-url",
            "sqlite::memory:",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .expect("parse");

        let options = cli.global.load_options();
        assert_eq!(options.config_path, Some(PathBuf::from("ops/leavegate.toml")));
        assert!(options.require_file);
        assert_eq!(options.overrides.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(options.overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(options.overrides.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn without_global_flags_no_file_is_required() {
        let cli = Cli::try_parse_from(["leavegate", "migrate"]).expect("parse");
        let options = cli.global.load_options();

        assert!(options.config_path.is_none());
        assert!(!options.require_file);
        assert!(options.overrides.database_url.is_none());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Cli::try_parse_from(["leavegate", "rules", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn stored_evaluation_needs_only_request_id() {
        let cli = Cli::try_parse_from(["leavegate", "evaluate", "--request-id", "lr-seed-001"])
            .expect("parse");
        match cli.command {
            Command::Evaluate { request_id, user_id, start, end } => {
                assert_eq!(request_id, "lr-seed-001");
                assert!(user_id.is_none() && start.is_none() && end.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ad_hoc_evaluation_requires_all_window_arguments() {
        let partial = Cli::try_parse_from([
            "leavegate",
            "evaluate",
            "--request-id",
            "adhoc",
            "--start",
            "2026-11-02",
        ]);
        assert!(partial.is_err());

        let complete = Cli::try_parse_from([
            "leavegate",
            "evaluate",
            "--request-id",
            "adhoc",
            "--user-id",
            "usr-bob-001",
            "--start",
            "2026-11-02",
            "--end",
            "2026-11-03",
        ]);
        assert!(complete.is_ok());
    }
}
