//! CLI argument definitions for the retail ETL.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "retail-etl",
    version,
    about = "Retail ETL - build a star schema from raw sales extracts",
    long_about = "Clean the customer, product and supplier extracts, build the shared time\n\
                  dimension, reconcile the sales and shipment facts, and write the\n\
                  star-schema tables as CSV ready for warehouse loading."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Allow row values (names, contacts) in debug logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline from raw extracts to output tables.
    Run(RunArgs),

    /// Re-check referential integrity of previously written outputs.
    Verify(VerifyArgs),

    /// List the star-schema tables.
    Tables,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding the five raw extracts.
    #[arg(long = "input-dir", value_name = "DIR", default_value = "data")]
    pub input_dir: PathBuf,

    /// Directory for the cleaned tables.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Width identifiers are zero-padded to.
    #[arg(long = "id-width", value_name = "N", default_value_t = 10)]
    pub id_width: usize,

    /// Seconds to wait for the dimension cleaners before failing.
    #[arg(long = "stage-timeout", value_name = "SECONDS", default_value_t = 30)]
    pub stage_timeout: u64,

    /// Clean the dimensions one after another instead of on worker threads.
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Directory with p_keys.sql, f_keys.sql and indexes.sql to apply after loading.
    #[arg(long = "constraints-dir", value_name = "DIR")]
    pub constraints_dir: Option<PathBuf>,

    /// Write load_manifest.json for an external bulk loader.
    #[arg(long = "manifest")]
    pub manifest: bool,
}

#[derive(Parser)]
pub struct VerifyArgs {
    /// Directory holding the written output tables.
    #[arg(value_name = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,
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
