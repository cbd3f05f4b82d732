pub mod cli;
pub mod config;
pub mod field;
pub mod filter;
pub mod operators;
pub mod predicate;
pub mod query;
pub mod value;

use crate::config::FilterConfig;
use colored::Colorize;
pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use field::{BooleanTokens, DateFormat, EnumChoices, Field, FieldBuilder, FieldType};
pub use filter::{
    ErrorKind, FieldSet, Filter, FilterDefinition, FilterError, FilterInput, QueryData,
    parse_query_string,
};
pub use operators::Operator;
pub use predicate::{
    Column, CompareOp, Expr, LikePattern, Predicate, SqlParams, escape_like_pattern,
};
pub use query::{MemoryQuery, Queryable, Row, SelectQuery};
pub use value::Value;

/// Report fields whose input would be dropped under the suppressing policy
fn print_field_warnings(fields: &FieldSet, data: &QueryData) {
    for (name, field) in fields.iter() {
        let Some(raw) = data.get(name).or(field.default()) else {
            continue;
        };
        if let Err(err) = field.filter(raw.clone()) {
            eprintln!(
                "{} field '{}' ignored: {}",
                "Warning:".yellow().bold(),
                name,
                err
            );
        }
    }
}

fn print_fields(fields: &FieldSet) {
    println!("{}", "FIELDS".bold());
    for (name, field) in fields.iter() {
        let operator = field.operator_name().unwrap_or("<custom>");
        let default = field
            .default()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<20} {:<10} {:<10} source={} default={}",
            name.cyan(),
            field.field_type().name(),
            operator,
            field.source(),
            default
        );
    }
}

fn render_sql(
    config: &FilterConfig,
    fields: &FieldSet,
    query: &str,
    table: Option<&str>,
    strict: bool,
    format: OutputFormat,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = table
        .or(config.table.as_deref())
        .ok_or("No table given: pass --table or set `table` in the config")?;

    if verbose > 0 {
        print_field_warnings(fields, &parse_query_string(query));
    }

    let select = Filter::new(fields, SelectQuery::new(table))
        .raise_exceptions(strict || config.raise_exceptions)
        .filter(query)?;
    let (sql, params) = select.to_sql();

    match format {
        OutputFormat::Text => {
            println!("{}", sql);
            for (idx, value) in params.values.iter().enumerate() {
                println!("  ${} = {}", idx + 1, value.to_string().green());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "sql": sql,
                "params": params.values,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

const ENV_LOG: &str = "QUERY_FILTER_LOG";

/// Send library diagnostics to stderr; `-v` enables debug, `-vv` trace
fn init_logging(verbose: u8, ansi: bool) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "warn,query_filter=debug",
        _ => "warn,query_filter=trace",
    };
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .compact()
        .with_env_filter(filter)
        .init();
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli_parse();
    init_logging(cli.verbose, cli.color != ColorMode::Never);

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let config = config::load_config(cli.config.as_deref())
        .map_err(|e| format!("Failed to load config: {}", e))?;
    let fields = config.field_set()?;

    if cli.verbose > 0 {
        if let Some(path) = &cli.config {
            eprintln!("Config file: {}", path.display());
        }
        eprintln!("Declared fields: {}", fields.len());
    }

    match &cli.command {
        Commands::Sql {
            query,
            table,
            strict,
            format,
        } => render_sql(
            &config,
            &fields,
            query,
            table.as_deref(),
            *strict,
            *format,
            cli.verbose,
        ),
        Commands::Fields => {
            print_fields(&fields);
            Ok(())
        }
    }
}
