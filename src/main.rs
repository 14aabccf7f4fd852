use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use shelf_eval::config::EvaluationConfig;
use shelf_eval::dataset::assemble_dataset;
use shelf_eval::evaluator::Scorer;
use shelf_eval::loader::{load_export_from_file, load_ground_truth_from_file, load_predictions_from_file};
use shelf_eval::stats::DetectionStats;

/// Evaluate shelf product detections and prepare YOLO datasets.
#[derive(Parser, Debug)]
#[command(name = "shelf-eval", version, about)]
struct Cli {
    /// Print debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score predictions against the ground truth of an annotation export.
    Score(ScoreArgs),
    /// Count predicted products per class.
    Count(CountArgs),
    /// Copy images and write YOLO labels from an annotation export.
    Dataset(DatasetArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// NDJSON annotation export holding the ground truth.
    #[arg(long)]
    ground_truth: PathBuf,

    /// JSON array of predictions.
    #[arg(long)]
    predictions: PathBuf,

    /// JSON config file with `iou_threshold` and `min_confidence`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the config's IoU threshold.
    #[arg(long)]
    iou_threshold: Option<f64>,

    /// Overrides the config's minimum confidence.
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CountArgs {
    /// JSON array of predictions.
    #[arg(long)]
    predictions: PathBuf,

    #[arg(long, default_value_t = 0.25)]
    min_confidence: f64,
}

#[derive(Args, Debug)]
struct DatasetArgs {
    /// NDJSON annotation export.
    #[arg(long)]
    export: PathBuf,

    /// Directory holding the exported images.
    #[arg(long)]
    images: PathBuf,

    /// Output directory; `images/`, `labels/` and `classes.txt` are created in it.
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Score(args) => score(args),
        Commands::Count(args) => count(args),
        Commands::Dataset(args) => dataset(args),
    }
}

fn score(args: ScoreArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EvaluationConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EvaluationConfig::default(),
    };
    if let Some(iou_threshold) = args.iou_threshold {
        config.iou_threshold = iou_threshold;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.min_confidence = min_confidence;
    }

    let ground_truths = load_ground_truth_from_file(&args.ground_truth)
        .with_context(|| format!("failed to load ground truth {}", args.ground_truth.display()))?;
    let predictions = load_predictions_from_file(&args.predictions)
        .with_context(|| format!("failed to load predictions {}", args.predictions.display()))?;
    info!(
        ground_truths = ground_truths.len(),
        predictions = predictions.len(),
        iou_threshold = config.iou_threshold,
        "scoring"
    );

    let report = Scorer::new(config)?.evaluate(&ground_truths, &predictions)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.scores);
    }
    Ok(())
}

fn count(args: CountArgs) -> Result<()> {
    let predictions = load_predictions_from_file(&args.predictions)
        .with_context(|| format!("failed to load predictions {}", args.predictions.display()))?;
    let stats = DetectionStats::from_predictions(&predictions, args.min_confidence)?;
    println!("{stats}");
    Ok(())
}

fn dataset(args: DatasetArgs) -> Result<()> {
    let rows = load_export_from_file(&args.export)
        .with_context(|| format!("failed to load export {}", args.export.display()))?;
    let summary = assemble_dataset(&rows, &args.images, &args.output)
        .with_context(|| format!("failed to assemble dataset in {}", args.output.display()))?;
    println!(
        "Dataset assembled: {} images, {} labels, {} classes, {} rows skipped",
        summary.images,
        summary.labels,
        summary.classes.len(),
        summary.rows_skipped
    );
    Ok(())
}
