use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use sensor_readout::timestamp::parse_timestamp;
use sensor_readout::{ReadoutError, ReadoutRequest};
use tracing_subscriber::EnvFilter;

/// Decode a sensor-data readout request and show how its filters answer
#[derive(Debug, Parser)]
#[command(name = "readout", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Source,

    #[command(flatten)]
    checks: Checks,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Debug, Subcommand)]
enum Source {
    /// Decode an HTTP query string, e.g. `nodeId=N1&momentary=true`
    Query { query: String },
    /// Decode an XML request element from a file, or `-` for stdin
    Xml { path: PathBuf },
}

#[derive(Debug, Args)]
struct Checks {
    /// Node id to test against the node filter
    #[arg(long, global = true)]
    node: Option<String>,

    /// Cache type of the tested node
    #[arg(long, global = true, default_value = "")]
    cache_type: String,

    /// Source id of the tested node
    #[arg(long = "source", global = true, default_value = "")]
    source_id: String,

    /// Field names to test against the field filter
    #[arg(long = "field", global = true)]
    fields: Vec<String>,

    /// Timestamp to test against the time window
    #[arg(long, global = true)]
    at: Option<String>,
}

fn decode(source: &Source) -> Result<ReadoutRequest, ReadoutError> {
    match source {
        Source::Query { query } => ReadoutRequest::from_query_str(query),
        Source::Xml { path } => {
            let mut xml = String::new();
            let read = if path.as_os_str() == "-" {
                std::io::stdin().read_to_string(&mut xml)
            } else {
                std::fs::File::open(path).and_then(|mut f| f.read_to_string(&mut xml))
            };
            read.map_err(|e| ReadoutError::xml(format!("{}: {}", path.display(), e)))?;
            ReadoutRequest::from_xml_str(&xml)
        }
    }
}

fn report(request: &ReadoutRequest, checks: &Checks) {
    if let Some(node) = &checks.node {
        println!(
            "node {}: {}",
            node,
            request.should_report_node(node, &checks.cache_type, &checks.source_id)
        );
    }

    for field in &checks.fields {
        println!("field {}: {}", field, request.should_report_field(field));
    }

    if let Some(at) = &checks.at {
        match parse_timestamp(at) {
            Some(t) => println!("at {}: {}", at, request.should_report_timestamp(t)),
            None => eprintln!("at {}: not a timestamp", at),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let request = match decode(&cli.command) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error ({}): {}", e.status_code(), e);
            return ExitCode::from(2);
        }
    };

    let json = if cli.compact {
        request.to_json()
    } else {
        request.to_json_pretty()
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    report(&request, &cli.checks);
    ExitCode::SUCCESS
}
