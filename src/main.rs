#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod catalogue;
pub mod de;
pub mod error;
pub mod model;
pub mod search;
pub mod ser;
pub mod snapshot;

use catalogue::Catalogue;
use clap::{ArgAction, Parser, Subcommand};
use search::Searcher;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::error::Error;
use std::io::{self, Read, Write};

type Res<T = ()> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(
    name = "transport-catalogue",
    version,
    about = "Answers bus, stop and route queries over a transit catalogue",
    long_about = "Reads a JSON request document from stdin. `make_base` stores the catalogue \
                  in a binary snapshot, `process_requests` answers stat requests against \
                  a stored snapshot and `run` does both in one pass without a snapshot."
)]
struct Args {
    /// Log more (-v for debug, -vv for trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    /// Ingest base requests and write the snapshot file
    #[command(name = "make_base")]
    MakeBase,
    /// Load the snapshot file and answer stat requests
    #[command(name = "process_requests")]
    ProcessRequests,
    /// Ingest base requests and answer stat requests in one go
    #[command(name = "run")]
    Run,
}

fn main() -> Res {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Default::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let document = de::document(&input)?;
    debug!(
        "Read {} base requests and {} stat requests",
        document.base_requests.len(),
        document.stat_requests.len()
    );

    match args.mode {
        Mode::MakeBase => make_base(&document),
        Mode::ProcessRequests => process_requests(&document),
        Mode::Run => run(&document),
    }
}

fn ingest(document: &de::Document) -> Catalogue {
    let mut catalogue = Catalogue::new();
    let errors = de::load_base(&mut catalogue, &document.base_requests);
    if !errors.is_empty() {
        warn!("{} base requests were skipped", errors.len());
    }
    catalogue
}

fn make_base(document: &de::Document) -> Res {
    let settings = de::route_settings(document)?;
    let path = de::serialization_file(document)?;
    let catalogue = ingest(document);
    snapshot::save(&catalogue, settings, &path)?;
    Ok(())
}

fn process_requests(document: &de::Document) -> Res {
    let path = de::serialization_file(document)?;
    let (catalogue, settings) = snapshot::load(&path)?;
    answer(document, &catalogue, &Searcher::new(&catalogue, settings))
}

fn run(document: &de::Document) -> Res {
    let settings = de::route_settings(document)?;
    let catalogue = ingest(document);
    answer(document, &catalogue, &Searcher::new(&catalogue, settings))
}

fn answer(document: &de::Document, catalogue: &Catalogue, searcher: &Searcher) -> Res {
    info!("Starting stat requests");
    let requests = de::stat_requests(&document.stat_requests);
    let response = ser::responses(&requests, catalogue, searcher);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &response)?;
    writeln!(out)?;
    Ok(())
}
