//! Sift terminal front end.
//!
//! Loads a JSON corpus and searches it as you type, one query per line.
//! Results are printed a batch at a time; `:scroll N` moves the viewer down so
//! more rows are rendered. See [`input::Input`] for the other commands.

mod input;
mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use sift_config::ResultsConfig;
use sift_results::{Catalog, Document, MemoryFetcher, MountInputs, Query, SearchResultMount, ViewportEvent, mount_search_result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::input::Input;
use crate::terminal::{DocumentRow, LineViewport, TerminalView};

/// Sift command line arguments.
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Search a JSON corpus with incrementally rendered results")]
struct Args {
	/// JSON array of `{ location, title, text }` entries
	#[arg(value_name = "CORPUS")]
	corpus: PathBuf,

	/// TOML configuration file
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Visible rows
	#[arg(long, default_value_t = 5)]
	height: u32,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[derive(Debug, Deserialize)]
struct CorpusEntry {
	location: String,
	title: String,
	#[serde(default)]
	text: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let config = match &args.config {
		Some(path) => ResultsConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
		None => ResultsConfig::default(),
	};
	let documents = load_corpus(&args.corpus)?;
	info!(documents = documents.len(), corpus = %args.corpus.display(), "corpus loaded");

	let viewport = LineViewport::new(args.height);
	let view = TerminalView::new(std::io::stdout(), &viewport);
	let (queries, queries_rx) = mpsc::unbounded_channel();
	let (events, events_rx) = mpsc::unbounded_channel();
	let (active, active_rx) = watch::channel(true);

	let mounted = mount_search_result(
		SearchResultMount {
			view,
			viewport: viewport.clone(),
			fetcher: Arc::new(MemoryFetcher::new(documents)),
			items: Arc::new(DocumentRow),
			translations: Arc::new(Catalog::from_config(&config)),
		},
		MountInputs {
			queries: queries_rx,
			viewport_events: events_rx,
			active: active_rx,
		},
		&config,
	);

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	let mut quit = false;
	while let Some(line) = lines.next_line().await.context("reading stdin")? {
		match Input::parse(&line) {
			Ok(Input::Query(text)) => {
				if queries.send(Query::new(text).focused(true)).is_err() {
					break;
				}
			}
			Ok(Input::Scroll(row)) => {
				viewport.scroll_to(row);
				if events.send(ViewportEvent::Scroll).is_err() {
					break;
				}
			}
			Ok(Input::Resize(rows)) => {
				viewport.resize(rows);
				if events.send(ViewportEvent::Resize).is_err() {
					break;
				}
			}
			Ok(Input::Active(is_active)) => {
				if active.send(is_active).is_err() {
					break;
				}
			}
			Ok(Input::Quit) => {
				quit = true;
				break;
			}
			Err(message) => eprintln!("{message}"),
		}
	}

	if !quit {
		// stdin closed: let the last query settle and its first batch render.
		tokio::time::sleep(config.debounce() * 2 + config.frame_interval()).await;
	}
	mounted.unmount().await;
	info!(rows = viewport.rows(), "sift exiting");
	Ok(())
}

fn load_corpus(path: &Path) -> Result<Vec<Document>> {
	let raw = std::fs::read_to_string(path).with_context(|| format!("reading corpus {}", path.display()))?;
	let entries: Vec<CorpusEntry> = serde_json::from_str(&raw).with_context(|| format!("parsing corpus {}", path.display()))?;
	Ok(entries
		.into_iter()
		.map(|entry| Document::new(entry.location, entry.title, entry.text))
		.collect())
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("sift=trace,sift_results=trace,debug")
			} else {
				EnvFilter::new("sift=info,sift_results=info,warn")
			}
		})
	};

	// SIFT_LOG_DIR keeps stdout and stderr free for the result list
	if let Some(log_dir) = std::env::var("SIFT_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("sift.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "sift tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt().with_env_filter(filter()).with_writer(std::io::stderr).init();
}
