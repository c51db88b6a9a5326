use anyhow::Context;
use banks_etl::constants::DEFAULT_HEAD_ROWS;
use banks_etl::extract::{FilePageSource, HttpPageSource, PageSource};
use banks_etl::progress::FileProgressLog;
use banks_etl::query::run_query;
use banks_etl::{logging, EtlConfig, Pipeline};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "banks_etl")]
#[command(about = "Scrape the largest banks list, convert currencies, load to CSV and SQLite")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (default: ./banks_etl.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the page from a saved HTML file instead of the network
    #[arg(long, global = true)]
    html_file: Option<PathBuf>,

    /// Number of query rows printed after a full run
    #[arg(long, global = true, default_value_t = DEFAULT_HEAD_ROWS)]
    head: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Run the full pipeline (default)
    Run,
    /// Fetch and print the scraped table without converting or loading it
    Extract,
    /// Run a query against the loaded database and print every row
    Query {
        /// SQL to execute (default: SELECT * from the configured table)
        #[arg(long)]
        sql: Option<String>,
    },
}

fn page_source(cli: &Cli, config: &EtlConfig) -> anyhow::Result<Box<dyn PageSource>> {
    let source: Box<dyn PageSource> = match &cli.html_file {
        Some(path) => Box::new(FilePageSource::new(path)),
        None => Box::new(HttpPageSource::new(&config.source)?),
    };
    Ok(source)
}

fn run(cli: Cli, config: EtlConfig) -> anyhow::Result<()> {
    let progress = FileProgressLog::new(&config.output.progress_log_path);

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Run => {
            let source = page_source(&cli, &config)?;
            let pipeline = Pipeline::new(&config, source.as_ref(), &progress);
            let result = pipeline.run().context("pipeline run failed")?;

            println!("{}\n", result.extracted);
            println!("{}", result.query_result.head(cli.head));
            println!(
                "\n✅ {} banks written to {} and {}:{}",
                result.transformed.len(),
                config.output.csv_path.display(),
                config.output.db_path.display(),
                config.output.table_name
            );
        }
        Commands::Extract => {
            let source = page_source(&cli, &config)?;
            let pipeline = Pipeline::new(&config, source.as_ref(), &progress);
            let extracted = pipeline.extract().context("extraction failed")?;
            println!("{}", extracted);
        }
        Commands::Query { sql } => {
            let sql = sql.clone().unwrap_or_else(|| config.select_all_query());
            let result = run_query(&config.output.db_path, &sql)
                .with_context(|| format!("query failed: {}", sql))?;
            println!("{}", result);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = EtlConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let _guard = logging::init_logging(&config.output.log_dir).context("initializing logging")?;
    info!("🚀 Starting banks_etl");

    if let Err(e) = run(cli, config) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_runs_with_default_head() {
        let cli = Cli::try_parse_from(["banks_etl"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.head, DEFAULT_HEAD_ROWS);
    }

    #[test]
    fn head_is_accepted_without_a_subcommand() {
        let cli = Cli::try_parse_from(["banks_etl", "--head", "3"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.head, 3);
    }

    #[test]
    fn global_flags_follow_a_subcommand() {
        let cli = Cli::try_parse_from([
            "banks_etl",
            "run",
            "--head",
            "7",
            "--html-file",
            "page.html",
            "--config",
            "etl.toml",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Run));
        assert_eq!(cli.head, 7);
        assert_eq!(cli.html_file, Some(PathBuf::from("page.html")));
        assert_eq!(cli.config, Some(PathBuf::from("etl.toml")));
    }

    #[test]
    fn query_takes_optional_sql() {
        let cli = Cli::try_parse_from(["banks_etl", "query", "--sql", "SELECT 1"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Query { sql: Some("SELECT 1".to_string()) }));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
