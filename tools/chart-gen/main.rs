use clap::Parser;
use nagarezu::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

/// A CLI tool to generate flowchart artifacts without the dataset stages
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Identifier for this generation run, used in output paths
    #[arg(short, long, default_value = "charts")]
    run_id: String,

    /// Number of flowcharts to generate
    #[arg(short = 'n', long, default_value_t = 10)]
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

    /// Also invoke the external image renderer
    #[arg(long)]
    render: bool,

    /// Print the diagram script of the first generated flowchart
    #[arg(long)]
    show_first: bool,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = RunConfig::new(cli.run_id);
    config.flowchart_num = cli.count;
    config.max_node_num = cli.max_nodes;
    config.seed = cli.seed;
    config.data_root = cli.data_root;
    config.render_images = cli.render;

    if let Err(e) = config.validate() {
        eprintln!("Error: invalid configuration: {}", e);
        std::process::exit(1);
    }

    println!(
        "Generating {} flowcharts (max {} nodes) into '{}'...",
        config.flowchart_num,
        config.max_node_num,
        config.run_dir().display()
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let stats = match nagarezu::dataset::generate_flowcharts(&config, &mut rng) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Error: flowchart generation failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("-> Generated {} flowcharts.", stats.total());
    println!("\n{}", stats.summary());

    if cli.show_first {
        match Flowchart::load(config.chart_path(0)) {
            Ok(chart) => {
                println!("\n--- Flowchart 0 ---");
                print!("{}", chart.mermaid_script(&mut rng));
            }
            Err(e) => eprintln!("Could not reload flowchart 0: {}", e),
        }
    }
}
