use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use jr_common::api::SearchRequest;
use jr_common::ingest::SourceRecord;
use jr_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use jr_common::service::{EngineConfig, IngestScope, SearchService, SourceConnector};

/// Drive the matching engine from the command line: feed it raw source
/// records from a file, run a search, or preview a CV parse.
#[derive(Parser)]
#[command(name = "jr", version, about = "jobradar matching engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest raw source records and print the acknowledgement.
    Ingest(IngestArgs),
    /// Ingest raw source records, then run a ranked search over them.
    Search(SearchArgs),
    /// Parse CV text and print the extraction, storing nothing.
    ParseCv(ParseCvArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// Free keywords; category tags are lifted out automatically.
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,
    /// Country filters (names or ISO codes).
    #[arg(long, value_delimiter = ',')]
    countries: Vec<String>,
    /// Contract type filters (CDI, CDD, Freelance, Internship).
    #[arg(long, value_delimiter = ',')]
    contract_types: Vec<String>,
    /// Remote preference (remote, hybrid, onsite).
    #[arg(long)]
    remote: Option<String>,
    /// Minimum acceptable salary.
    #[arg(long)]
    salary_min: Option<i64>,
    /// Path to free CV text used as an ad-hoc profile.
    #[arg(long)]
    cv: Option<PathBuf>,
}

#[derive(Args)]
struct IngestArgs {
    /// JSON file holding an array of source records.
    #[arg(long)]
    records: PathBuf,
    #[command(flatten)]
    query: QueryArgs,
}

#[derive(Args)]
struct SearchArgs {
    /// JSON file holding an array of source records.
    #[arg(long)]
    records: PathBuf,
    #[command(flatten)]
    query: QueryArgs,
}

#[derive(Args)]
struct ParseCvArgs {
    /// File holding the raw CV text.
    #[arg(long)]
    file: PathBuf,
}

/// Connector over a local JSON file, standing in for the scraping
/// collaborators behind the same seam.
struct FileConnector {
    records: Vec<SourceRecord>,
}

impl FileConnector {
    fn load(path: &PathBuf) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)?;
        let records: Vec<SourceRecord> = serde_json::from_str(&content)?;
        Ok(Self { records })
    }
}

impl SourceConnector for FileConnector {
    fn source_id(&self) -> &str {
        "file"
    }

    fn fetch(&self, _scope: &IngestScope) -> Vec<SourceRecord> {
        self.records.clone()
    }
}

fn build_query(args: QueryArgs) -> Result<jr_common::SearchQuery, Box<dyn Error>> {
    let cv_summary = match &args.cv {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };

    let request = SearchRequest {
        keywords: args.keywords,
        countries: args.countries,
        contract_types: args.contract_types,
        remote_preference: args.remote,
        salary_min: args.salary_min,
        cv_summary,
    };
    Ok(request.into_query())
}

fn service_over(records: &PathBuf) -> Result<SearchService, Box<dyn Error>> {
    let mut service = SearchService::new(EngineConfig::from_env());
    service.register_connector(Box::new(FileConnector::load(records)?));
    Ok(service)
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    init_tracing_subscriber("jr");
    install_tracing_panic_hook("jr");

    let cli = Cli::parse();
    match cli.command {
        Command::Ingest(args) => {
            let service = service_over(&args.records)?;
            let query = build_query(args.query)?;
            let ack = service.ingest(&query)?;
            info!(run_id = %ack.run_id, "ingest finished");
            println!("{}", serde_json::to_string_pretty(&ack)?);
        }
        Command::Search(args) => {
            let service = service_over(&args.records)?;
            let query = build_query(args.query)?;
            let ack = service.ingest(&query)?;
            info!(run_id = %ack.run_id, total = ack.fetched, "refreshed postings");
            let response = service.search(&query, None)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::ParseCv(args) => {
            let cv_text = fs::read_to_string(&args.file)?;
            let extraction = jr_common::cv::parse_cv_text(&cv_text);
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
    }
    Ok(())
}
