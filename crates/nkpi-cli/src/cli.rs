//! CLI argument definitions for `nkpi`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "nkpi",
    version,
    about = "nKPI metric charts from SQL exports and spreadsheet ranges",
    long_about = "Normalize, reshape and filter monthly KPI tables into chart-ready series.\n\n\
                  Reads CSV exports (optionally an A1 range within them), applies a TOML\n\
                  transform spec, and prints the chart rows plus what was dropped."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -vvv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include cell values in trace logs for dropped rows.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Transform a table into chart rows.
    Render(RenderArgs),

    /// Average session duration per month.
    Sessions(SessionsArgs),

    /// New, existing and total entities per month.
    Entities(EntitiesArgs),

    /// List dashboard pages, or the panels of one page.
    Pages(PagesArgs),
}

#[derive(Parser)]
pub struct SourceArgs {
    /// CSV export to read.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Read only this A1 range (e.g. A1:F40); its first row is the header.
    #[arg(long = "range", value_name = "A1:Z99")]
    pub range: Option<String>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Transform spec (TOML). Defaults to a wide table keyed by "Month-Year".
    #[arg(long = "spec", value_name = "TOML")]
    pub spec: Option<PathBuf>,

    /// Chart title (overrides the one in --spec).
    #[arg(long = "title")]
    pub title: Option<String>,
}

#[derive(Parser)]
pub struct SessionsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Column holding the session identifier.
    #[arg(long = "session-column", default_value = "session_id")]
    pub session_column: String,

    /// Column holding the event timestamp.
    #[arg(long = "timestamp-column", default_value = "timestamp")]
    pub timestamp_column: String,
}

#[derive(Parser)]
pub struct EntitiesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Column holding the creation timestamp.
    #[arg(long = "created-column", default_value = "created_at")]
    pub created_column: String,

    /// Column flagging soft-deleted entities.
    #[arg(long = "deleted-column")]
    pub deleted_column: Option<String>,
}

#[derive(Parser)]
pub struct PagesArgs {
    /// Page to show (case-insensitive).
    #[arg(value_name = "PAGE")]
    pub page: Option<String>,

    /// Extra catalog (TOML) merged over the built-in pages.
    #[arg(long = "catalog", value_name = "TOML")]
    pub catalog: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
