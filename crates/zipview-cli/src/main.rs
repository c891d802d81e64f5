//! zipview CLI: zip CSV files positionally and stream the result.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use zipview_core::config::{parse_delimiter, ZipConfig};
use zipview_core::schema::RowSchema;
use zipview_core::source::TabularSource;
use zipview_io::{drain, CsvTable, CsvWriter, JsonlWriter, RowSink};
use zipview_zip::{create, ZipView};

#[derive(Parser)]
#[command(name = "zipview")]
#[command(about = "Zip tabular files row by row, truncated to the shortest input", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct InputArgs {
    /// CSV files, zipped in the order given
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Field delimiter (overrides config); `\t` for tabs
    #[arg(long)]
    delimiter: Option<String>,

    /// Inputs have no header row
    #[arg(long)]
    no_headers: bool,

    /// Rows sampled for type inference (overrides config)
    #[arg(long)]
    infer_rows: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Jsonl,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream the zipped rows to stdout
    Zip {
        #[command(flatten)]
        input: InputArgs,

        /// Columns to output, by name; later inputs win on duplicates
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Rows to skip before output starts
        #[arg(long)]
        skip: Option<u64>,

        /// Maximum rows to output
        #[arg(long)]
        limit: Option<u64>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
        format: OutputFormat,

        /// Requested cursor-set size (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,
    },

    /// Print the composed schema as JSON
    Schema {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the composed row count
    Count {
        #[command(flatten)]
        input: InputArgs,

        /// Allow full scans to count rows
        #[arg(long)]
        expensive: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Zip {
            input,
            columns,
            skip,
            limit,
            format,
            parallelism,
        } => run_zip(&input, &columns, skip, limit, format, parallelism),
        Commands::Schema { input } => run_schema(&input),
        Commands::Count { input, expensive } => run_count(&input, expensive),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(input: &InputArgs) -> Result<ZipConfig, Box<dyn std::error::Error>> {
    let mut config = ZipConfig::from_env();
    apply_input_overrides(&mut config, input)?;
    Ok(config)
}

fn apply_input_overrides(
    config: &mut ZipConfig,
    input: &InputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(d) = &input.delimiter {
        config.csv_delimiter =
            parse_delimiter(d).ok_or_else(|| format!("invalid delimiter '{}'", d))?;
    }
    if input.no_headers {
        config.csv_has_headers = false;
    }
    if let Some(rows) = input.infer_rows {
        config.infer_rows = rows;
    }
    Ok(())
}

fn open_sources(
    input: &InputArgs,
    config: &ZipConfig,
) -> Result<Vec<Arc<dyn TabularSource>>, Box<dyn std::error::Error>> {
    let mut sources: Vec<Arc<dyn TabularSource>> = Vec::with_capacity(input.inputs.len());
    for path in &input.inputs {
        let table = CsvTable::open(path, config.csv_options())
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        sources.push(Arc::new(table));
    }
    Ok(sources)
}

/// Resolve output column names to global indices; empty means all columns.
fn resolve_columns(
    schema: &dyn RowSchema,
    names: &[String],
) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    if names.is_empty() {
        return Ok((0..schema.column_count()).collect());
    }
    names
        .iter()
        .map(|name| {
            schema
                .find_column(name)
                .ok_or_else(|| format!("unknown column '{}'", name).into())
        })
        .collect()
}

fn run_zip(
    input: &InputArgs,
    columns: &[String],
    skip: Option<u64>,
    limit: Option<u64>,
    format: OutputFormat,
    parallelism: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(input)?;
    if let Some(p) = parallelism {
        config.parallelism = p.max(1);
    }

    let view = create(open_sources(input, &config)?)?;
    let schema = view.schema();
    let selected = resolve_columns(schema.as_ref(), columns)?;

    let wanted = |c: usize| selected.contains(&c);
    let mut cursor = view
        .open_cursor_set(&wanted, config.parallelism)?
        .into_single()?;

    if let Some(n) = skip.filter(|&n| n > 0) {
        cursor.advance_many(n)?;
    }

    let stdout = io::stdout();
    let mut sink: Box<dyn RowSink> = match format {
        OutputFormat::Jsonl => Box::new(JsonlWriter::to_writer(
            stdout.lock(),
            schema.as_ref(),
            &selected,
        )?),
        OutputFormat::Csv => Box::new(CsvWriter::to_writer(
            stdout.lock(),
            config.csv_delimiter,
            schema.as_ref(),
            &selected,
        )?),
    };
    drain(cursor.as_mut(), sink.as_mut(), limit)?;
    cursor.dispose();
    Ok(())
}

fn run_schema(input: &InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(input)?;
    let view = ZipView::try_new(open_sources(input, &config)?)?;
    let columns = view.composed_schema().columns()?;
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &columns)?;
    writeln!(out)?;
    Ok(())
}

fn run_count(input: &InputArgs, expensive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(input)?;
    let view = create(open_sources(input, &config)?)?;
    match view.row_count(expensive || config.allow_expensive_row_count)? {
        Some(n) => println!("{}", n),
        None => println!("unknown"),
    }
    Ok(())
}
