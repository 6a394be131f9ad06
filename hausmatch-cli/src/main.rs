use clap::Parser;
use hausmatch::io::{load_shape, EdgeDetectConfig};
use hausmatch::{
    CancelToken, DistanceNorm, MatchConfig, Matcher, Offset, SearchResult, Shape, SweepRange,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

const HELP: &str = "commands: f = find best pose, p X Y = preview offset, q = quit";

#[derive(Parser, Debug)]
#[command(author, version, about = "Find a needle shape in a haystack image by Hausdorff distance")]
struct Cli {
    /// Image containing the shape to look for.
    #[arg(value_name = "NEEDLE", required_unless_present_any = ["print_schema", "print_example"])]
    needle: Option<PathBuf>,
    /// Image to search in.
    #[arg(value_name = "HAYSTACK", required_unless_present_any = ["print_schema", "print_example"])]
    haystack: Option<PathBuf>,
    /// Optional JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Run one pose search, print the result and exit.
    #[arg(long)]
    find: bool,
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
#[serde(rename_all = "snake_case")]
enum NormConfig {
    L1,
    Euclidean,
}

impl From<NormConfig> for DistanceNorm {
    fn from(value: NormConfig) -> Self {
        match value {
            NormConfig::L1 => DistanceNorm::L1,
            NormConfig::Euclidean => DistanceNorm::Euclidean,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EdgesJson {
    blur_sigma: f32,
    low_threshold: f32,
    high_threshold: f32,
}

impl Default for EdgesJson {
    fn default() -> Self {
        let cfg = EdgeDetectConfig::default();
        Self {
            blur_sigma: cfg.blur_sigma,
            low_threshold: cfg.low_threshold,
            high_threshold: cfg.high_threshold,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SweepJson {
    min: f32,
    max: f32,
    step: f32,
}

impl From<SweepJson> for SweepRange {
    fn from(value: SweepJson) -> Self {
        SweepRange::new(value.min, value.max, value.step)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    edges: EdgesJson,
    norm: NormConfig,
    initial_step: usize,
    rotation: SweepJson,
    scale: SweepJson,
    parallel: bool,
    time_budget_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            edges: EdgesJson::default(),
            norm: NormConfig::L1,
            initial_step: cfg.initial_step,
            rotation: SweepJson {
                min: cfg.rotation.min,
                max: cfg.rotation.max,
                step: cfg.rotation.step,
            },
            scale: SweepJson {
                min: cfg.scale.min,
                max: cfg.scale.max,
                step: cfg.scale.step,
            },
            parallel: cfg.parallel,
            time_budget_ms: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct PoseRecord {
    dx: i32,
    dy: i32,
    rotation_deg: f32,
    scale: f32,
    score: f32,
    has_overlap: bool,
}

impl From<SearchResult> for PoseRecord {
    fn from(value: SearchResult) -> Self {
        Self {
            dx: value.pose.offset.dx,
            dy: value.pose.offset.dy,
            rotation_deg: value.pose.rotation_deg,
            scale: value.pose.scale,
            score: value.score,
            has_overlap: value.has_overlap(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchOutput {
    best: Option<PoseRecord>,
    cancelled: bool,
    elapsed_secs: f64,
}

#[derive(Debug, Serialize)]
struct PreviewOutput {
    preview: PoseRecord,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("hausmatch=debug".parse()?))
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(ExitCode::SUCCESS);
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(ExitCode::SUCCESS);
    }

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if config.initial_step == 0 {
        return Err("initial_step must be at least 1".into());
    }

    let edge_cfg = EdgeDetectConfig {
        blur_sigma: config.edges.blur_sigma,
        low_threshold: config.edges.low_threshold,
        high_threshold: config.edges.high_threshold,
    };
    let norm: DistanceNorm = config.norm.into();
    let (Some(needle_path), Some(haystack_path)) = (cli.needle.as_deref(), cli.haystack.as_deref())
    else {
        return Err("NEEDLE and HAYSTACK are required".into());
    };
    let Some(haystack) = open_shape(haystack_path, &edge_cfg, norm) else {
        return Ok(ExitCode::FAILURE);
    };
    let Some(needle) = open_shape(needle_path, &edge_cfg, norm) else {
        return Ok(ExitCode::FAILURE);
    };

    let matcher = Matcher::new(needle, haystack).with_config(MatchConfig {
        initial_step: config.initial_step,
        rotation: config.rotation.into(),
        scale: config.scale.into(),
        norm,
        parallel: config.parallel,
    });
    let budget = config.time_budget_ms.map(Duration::from_millis);

    if cli.find {
        print_json(&run_search(&matcher, budget))?;
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("{HELP}");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("q") | Some("quit") => break,
            Some("f") | Some("find") => print_json(&run_search(&matcher, budget))?,
            Some("p") | Some("preview") => {
                let coords: Vec<i32> = words.filter_map(|w| w.parse().ok()).collect();
                match coords.as_slice() {
                    [dx, dy] if matcher.placements().contains(Offset::new(*dx, *dy)) => {
                        let preview = matcher.evaluate(Offset::new(*dx, *dy));
                        print_json(&PreviewOutput {
                            preview: preview.into(),
                        })?;
                    }
                    [_, _] => eprintln!("offset outside {:?}", matcher.placements()),
                    _ => eprintln!("usage: p X Y"),
                }
            }
            Some(_) => eprintln!("{HELP}"),
            None => {}
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn open_shape(path: &Path, cfg: &EdgeDetectConfig, norm: DistanceNorm) -> Option<Shape> {
    tracing::info!(path = %path.display(), "opening image");
    match load_shape(path, cfg, norm) {
        Ok(shape) => Some(shape),
        Err(err) => {
            eprintln!("could not open {}: {err}", path.display());
            None
        }
    }
}

fn run_search(matcher: &Matcher, budget: Option<Duration>) -> SearchOutput {
    let cancel = match budget {
        Some(budget) => CancelToken::new().with_deadline(budget),
        None => CancelToken::new(),
    };
    let start = Instant::now();
    let best = matcher.search_pose_with(&cancel);
    SearchOutput {
        best: best.map(PoseRecord::from),
        cancelled: cancel.is_cancelled(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}
