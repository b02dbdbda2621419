use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use stitchmatch::io::load_rgba_image;
use stitchmatch::{spawn_search, ImageStack, MatchConfig, MatchRequest, SearchOutcome};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "StitchMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Answer a single wire-format match request, streaming events as JSON lines.
    #[arg(long, value_name = "FILE", conflicts_with = "config")]
    request: Option<PathBuf>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    provisional_match_width_factor: f64,
    min_matching_lines: usize,
    max_horizontal_offset: usize,
    max_y_offset_factor: f64,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            provisional_match_width_factor: cfg.provisional_match_width_factor,
            min_matching_lines: cfg.min_matching_lines,
            max_horizontal_offset: cfg.max_horizontal_offset,
            max_y_offset_factor: cfg.max_y_offset_factor,
        }
    }
}

impl From<&MatchConfigJson> for MatchConfig {
    fn from(value: &MatchConfigJson) -> Self {
        MatchConfig {
            provisional_match_width_factor: value.provisional_match_width_factor,
            min_matching_lines: value.min_matching_lines,
            max_horizontal_offset: value.max_horizontal_offset,
            max_y_offset_factor: value.max_y_offset_factor,
            parallel: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_paths: Vec<String>,
    output_path: Option<String>,
    progress: bool,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

#[derive(Debug, Serialize)]
struct PairRecord {
    upper: String,
    lower: String,
    matched: bool,
    x_offset: Option<isize>,
    y_offset: Option<usize>,
    lines: usize,
    candidates_evaluated: usize,
}

impl PairRecord {
    fn new(upper: &str, lower: &str, outcome: &SearchOutcome) -> Self {
        let matched = outcome.matched();
        Self {
            upper: upper.to_owned(),
            lower: lower.to_owned(),
            matched: matched.is_some(),
            x_offset: matched.map(|a| a.x_offset),
            y_offset: matched.map(|a| a.y_offset),
            lines: outcome.best_lines,
            candidates_evaluated: outcome.candidates_evaluated,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    pairs: Vec<PairRecord>,
}

fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned())
}

fn answer_request(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let request: MatchRequest = serde_json::from_str(&text)?;
    let worker = spawn_search(request.top, request.bottom, request.config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for event in worker.events() {
        serde_json::to_writer(&mut out, &event)?;
        out.write_all(b"\n")?;
        if event.is_exhausted() {
            break;
        }
    }
    out.flush()?;
    worker.join()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("stitchmatch=info".parse()?),
            )
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }
    if let Some(path) = &cli.request {
        return answer_request(path);
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_paths.len() < 2 {
        return Err("image_paths must list at least two images".into());
    }
    let match_cfg = MatchConfig::from(&config.match_cfg);
    match_cfg.validate()?;

    let mut stack = ImageStack::new();
    for path in &config.image_paths {
        let image = load_rgba_image(path)?;
        tracing::info!(
            path = path.as_str(),
            width = image.width(),
            height = image.height(),
            "loaded capture"
        );
        stack.insert(display_name(path), image);
    }

    let mut pairs = Vec::with_capacity(stack.len() - 1);
    for (upper, lower) in stack.adjacent_pairs() {
        let worker = spawn_search(
            upper.image().clone(),
            lower.image().clone(),
            match_cfg.clone(),
        )?;
        for event in worker.events() {
            if config.progress {
                eprintln!("{}", serde_json::to_string(&event)?);
            }
            if event.is_exhausted() {
                break;
            }
        }
        let outcome = worker.join()?;
        pairs.push(PairRecord::new(upper.name(), lower.name(), &outcome));
    }

    let json = serde_json::to_string_pretty(&Output { pairs })?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
