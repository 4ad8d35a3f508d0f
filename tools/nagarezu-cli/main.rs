use clap::Parser;
use nagarezu::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

/// A synthetic flowchart dataset generator CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Identifier for this generation run, used in output paths
    #[arg(short, long, default_value = "test")]
    run_id: String,

    /// Number of flowcharts to generate
    #[arg(short = 'n', long, default_value_t = 5)]
    count: usize,

    /// Maximum node count per flowchart (3..=26)
    #[arg(long, default_value_t = 25)]
    max_nodes: usize,

    /// Seed for the run's random generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Root directory for generated data
    #[arg(long, default_value = "data")]
    data_root: PathBuf,

    /// Skip invoking the external image renderer
    #[arg(long)]
    no_images: bool,

    /// Skip recognized-text context blocks in questions
    #[arg(long)]
    no_ocr: bool,

    /// Emit bare answers instead of step-by-step reasoning
    #[arg(long)]
    no_cot: bool,

    /// Minimum confidence for recognized text fragments
    #[arg(long, default_value_t = 0.7)]
    min_confidence: f64,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = RunConfig::new(cli.run_id);
    config.flowchart_num = cli.count;
    config.max_node_num = cli.max_nodes;
    config.seed = cli.seed;
    config.data_root = cli.data_root;
    config.render_images = !cli.no_images;
    config.use_ocr = !cli.no_ocr;
    config.use_cot = !cli.no_cot;
    config.min_confidence = cli.min_confidence;

    if let Err(e) = config.validate() {
        exit_with_error(&format!("Invalid configuration: {}", e));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let total_start = Instant::now();

    // --- 1. Flowchart Generation (and rendering, if enabled) ---
    println!(
        "\nGenerating {} flowcharts into '{}'...",
        config.flowchart_num,
        config.run_dir().display()
    );
    let charts_start = Instant::now();
    let chart_stats = nagarezu::dataset::generate_flowcharts(&config, &mut rng)
        .unwrap_or_else(|e| exit_with_error(&format!("Flowchart generation failed: {}", e)));
    let charts_duration = charts_start.elapsed();

    // --- 2. Recognized-Text Context ---
    // Recognition runs out of process; reuse a persisted store when present.
    let ocr_store = if config.use_ocr {
        match OcrStore::load(config.ocr_results_path()) {
            Ok(store) => {
                println!("Loaded recognized-text store ({} entries).", store.len());
                Some(store)
            }
            Err(_) => {
                println!("No recognized-text store found. Questions carry no context blocks.");
                None
            }
        }
    } else {
        None
    };

    // --- 3. Sample Assembly ---
    println!("\nAssembling samples...");
    let samples_start = Instant::now();
    let sample_stats =
        nagarezu::dataset::generate_samples(&config, ocr_store.as_ref(), &mut rng)
            .unwrap_or_else(|e| exit_with_error(&format!("Sample assembly failed: {}", e)));
    let samples_duration = samples_start.elapsed();

    // --- 4. Results and Summary ---
    println!("\n{}", chart_stats.summary());
    println!("\n{}", sample_stats.show_all());

    let total_duration = total_start.elapsed();
    println!("\n--- Performance Summary ---");
    println!("Flowchart Generation: {:?}", charts_duration);
    println!("Sample Assembly:      {:?}", samples_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_duration);
    println!();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
