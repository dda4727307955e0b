use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use ft8qso::{
    config::AppConfig,
    ingest::controller::Ingestor,
    parse::LineParser,
    persist::sqlite::SqliteRecordStore,
    query::{QsoQuery, SessionFilter, normalize_call},
    report,
    session::SessionReconstructor,
};

#[derive(Parser)]
#[command(name = "ft8qso", version, about = "FT8 log ingestion and QSO search")]
struct Args {
    /// SQLite database path
    #[arg(long, global = true, default_value = "wsjtx_logs.db")]
    db: PathBuf,

    /// JSON config file (station, bands, parser, ingest)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the operator call-sign from the config
    #[arg(long, global = true)]
    operator: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest new lines of a log file
    Ingest {
        /// Log file, e.g. ALL.TXT
        log: PathBuf,
    },
    /// List QSOs with one station
    Search {
        /// Target call-sign
        callsign: String,
        /// Print member lines under each QSO
        #[arg(long)]
        detail: bool,
    },
    /// List QSOs with every station
    All {
        /// Only peers containing this text
        #[arg(long)]
        call: Option<String>,
        /// Only this band, e.g. 20m
        #[arg(long)]
        band: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(op) = &args.operator {
        cfg.station.operator_call = normalize_call(op);
        cfg.validate()?;
    }

    let mut store = SqliteRecordStore::open(&args.db)?;

    match args.command {
        Command::Ingest { log } => {
            let parser = LineParser::new(&cfg.parser);
            let report = Ingestor::new(&mut store, parser, cfg.ingest.clone()).ingest_path(&log)?;
            println!(
                "Stored {} record(s) from {} ({} line(s) skipped), offset {} -> {}",
                report.records_stored,
                report.source_id,
                report.lines_rejected,
                report.start_offset,
                report.end_offset
            );
        }
        Command::Search { callsign, detail } => {
            let query = build_query(&store, &cfg);
            let target = normalize_call(&callsign);
            let sessions = query.sessions_with(&target)?;
            print!("{}", report::render_target_report(&sessions, &target));
            if detail {
                for s in &sessions {
                    print!("{}", report::render_detail(s, &cfg.station.grid));
                }
            }
        }
        Command::All { call, band } => {
            let query = build_query(&store, &cfg);
            let filter = SessionFilter {
                call_contains: call,
                band,
            };
            let sessions = filter.apply(query.all_sessions()?);
            if sessions.is_empty() {
                println!("No QSOs found.");
            } else {
                print!("{}", report::render_all(&sessions));
            }
        }
    }
    Ok(())
}

fn build_query<'s>(store: &'s SqliteRecordStore, cfg: &AppConfig) -> QsoQuery<'s, SqliteRecordStore> {
    let reconstructor = SessionReconstructor::new(&cfg.station, cfg.bands.clone());
    QsoQuery::new(store, &cfg.station.operator_call, reconstructor)
}
