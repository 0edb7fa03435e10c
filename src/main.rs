use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use csv_table_import::config::{self, ImportConfig};
use csv_table_import::ingestion::{
    CompositeObserver, FileObserver, ImportObserver, ImportOptions, ImportSeverity, StdOutObserver,
    run_import,
};
use csv_table_import::store::{self, ledger};

/// Import every new CSV file of a directory into SQLite, one text-typed table per file.
///
/// Settings come from `.env` / environment variables; flags override them.
#[derive(Debug, Parser)]
#[command(name = "csv-table-import", version, about)]
struct Cli {
    /// Directory scanned for `*.csv` files [env: EXPORTS_FOLDER]
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// SQLite database file [env: IMPORT_DB_PATH]
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Append-only status log [env: IMPORT_LOG_FILE]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the import ledger and exit
    #[arg(long)]
    list: bool,

    /// Print the run summary as JSON after the run
    #[arg(long)]
    summary_json: bool,
}

impl Cli {
    fn into_config(self, mut config: ImportConfig) -> ImportConfig {
        if let Some(dir) = self.source_dir {
            config.source_dir = dir;
        }
        if let Some(db) = self.database {
            config.database.path = db;
        }
        if let Some(log) = self.log_file {
            config.log_file = log;
        }
        config
    }
}

fn main() -> ExitCode {
    fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let list = cli.list;
    let summary_json = cli.summary_json;

    config::load_dotenv();
    let config = cli.into_config(ImportConfig::from_env());
    info!(?config, "configuration loaded");

    if list {
        let conn = store::connect(&config.database)
            .with_context(|| format!("opening {}", config.database.path.display()))?;
        ledger::ensure_exists(&conn)?;
        for entry in ledger::entries(&conn)? {
            println!("{}\t{}", entry.imported_at, entry.file_name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let log = Arc::new(FileObserver::new(&config.log_file));
    let observers: Vec<Arc<dyn ImportObserver>> = vec![Arc::new(StdOutObserver), log.clone()];
    let opts = ImportOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };

    let summary = match run_import(&config, &opts) {
        Ok(summary) => summary,
        Err(err) => {
            log.log(ImportSeverity::Critical, &format!("Run aborted: {err}"));
            return Err(err).with_context(|| {
                format!(
                    "importing {} into {}",
                    config.source_dir.display(),
                    config.database.path.display()
                )
            });
        }
    };

    if summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(if summary.failed() > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}
