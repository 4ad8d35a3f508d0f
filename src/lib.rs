//! # Nagarezu - Flowchart QA Dataset Synthesizer
//!
//! **Nagarezu** generates labeled datasets of flowchart diagrams paired with
//! natural-language question/answer conversations, for training and
//! evaluating vision-language models on flowchart reasoning.
//!
//! ## Core Workflow
//!
//! The pipeline treats one flowchart as the unit of work:
//!
//! 1.  **Generate**: [`chart::FlowchartBuilder`] draws a random, structurally
//!     valid flowchart (optionally with decision nodes carrying `Y`/`N`
//!     branches) under configurable shape constraints, and persists it
//!     together with its diagram script.
//! 2.  **Render**: an external diagram tool turns each script into an image
//!     ([`render::Renderer`]); failures are per-item and never abort a batch.
//! 3.  **Query**: [`query::QuerySolver`] answers five classes of
//!     reachability/validity questions against the chart's adjacency matrix,
//!     and [`trace::TraceBuilder`] narrates each answer as a deterministic
//!     step-by-step explanation.
//! 4.  **Assemble**: [`sample::SampleBuilder`] packages questions, answers,
//!     and ground truth into training and evaluation records, while running
//!     statistics accumulate for the batch report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nagarezu::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Seed once; the generator is deterministic given the seed.
//!     let mut rng = StdRng::seed_from_u64(42);
//!
//!     // Generate a single flowchart and query it directly.
//!     let chart = FlowchartBuilder::new(25).build(&mut rng);
//!     let matrix = chart.matrix();
//!     let solver = QuerySolver::new(&matrix);
//!     println!("successors of node 0: {:?}", solver.all_next(0));
//!
//!     // Or run a full dataset batch into `data/demo/`.
//!     let config = RunConfig::new("demo");
//!     let (chart_stats, sample_stats) =
//!         nagarezu::dataset::run_pipeline(&config, None, &mut rng)?;
//!     println!("{}", chart_stats.summary());
//!     println!("{}", sample_stats.show_all());
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ocr;
pub mod prelude;
pub mod query;
pub mod question;
pub mod render;
pub mod sample;
pub mod sampling;
pub mod trace;
