use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Turn query strings into filtered SQL using a declarative field definition
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML file declaring the filter fields
    #[arg(short, long, env = "QUERY_FILTER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Control colored diagnostics
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Increase diagnostic output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the SELECT statement produced by a query string
    Sql {
        /// Query string, e.g. "name=jim&number_of_heads=2"
        query: String,

        /// Table to select from (overrides the config)
        #[arg(short, long)]
        table: Option<String>,

        /// Fail on the first invalid field instead of dropping it
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the declared fields with their type, operator and default
    Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
