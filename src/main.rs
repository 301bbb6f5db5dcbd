use anyhow::Result;
use clap::Parser;
use handledger::cli::{date_window, Cli, Commands};
use handledger::db::HandStore;
use handledger::render::ChartSink;
use handledger::{
    config::Config, init_db, AggregationSettings, AppError, CsvChartWriter, HandFormat, HandParser,
    Ingestor, ParserOptions, Reporter, Repository,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env().map_err(AppError::from)?;

    match cli.command {
        Commands::Parse {
            input,
            db,
            keep_incomplete,
            hero,
        } => {
            let hero_name = hero.unwrap_or_else(|| config.hero_name.clone());
            let options = ParserOptions {
                keep_incomplete: keep_incomplete || config.keep_incomplete,
                ..ParserOptions::default()
            };
            let format = HandFormat::new(&hero_name).map_err(AppError::from)?;
            let db_path = db.unwrap_or_else(|| config.database_path.clone());
            let store = open_store(&db_path).await?;

            let ingestor = Ingestor::new(store, HandParser::new(format, options));
            let result = ingestor
                .ingest_directory(&input)
                .await
                .map_err(AppError::from)?;

            println!("Files read:      {}", result.files);
            println!("Hands parsed:    {}", result.hands_parsed);
            println!("Hands inserted:  {}", result.hands_inserted);
            println!("Hands skipped:   {}", result.hands_skipped);
            if result.hands_rejected > 0 {
                println!("Hands rejected:  {}", result.hands_rejected);
            }
            if result.hands_discarded > 0 {
                println!("Hands truncated: {}", result.hands_discarded);
            }
            println!("Profit (new):    ${}", result.total_profit.round2());
        }
        Commands::Chart {
            db,
            output,
            start,
            end,
            interval,
        } => {
            let window = date_window(start, end).map_err(AppError::BadRequest)?;
            let settings = AggregationSettings {
                interval: interval.map_or(config.interval, |n| n as usize),
            };
            let out_dir: PathBuf = output.unwrap_or_else(|| config.output_dir.clone());
            let db_path = db.unwrap_or_else(|| config.database_path.clone());
            let store = open_store(&db_path).await?;

            let report = Reporter::new(store)
                .build(window.as_ref(), &settings)
                .await
                .map_err(AppError::from)?;
            let written = CsvChartWriter::new(out_dir)
                .write_report(&report)
                .map_err(AppError::from)?;

            let summary = &report.summary;
            println!("Hands:          {}", summary.hands);
            println!("Total profit:   ${}", summary.total_profit.round2());
            println!("Rake paid:      ${}", summary.total_rake.round2());
            println!("BB/100:         {}", summary.bb100);
            for path in written {
                println!("  wrote {}", path.display());
            }
        }
    }

    Ok(())
}

async fn open_store(path: &Path) -> Result<Arc<dyn HandStore>, AppError> {
    let pool = init_db(&path.to_string_lossy()).await?;
    Ok(Arc::new(Repository::new(pool)))
}
