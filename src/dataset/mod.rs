//! The batch pipeline: flowchart generation, rendering, recognized-text
//! context, sample assembly, and dataset output.
//!
//! One flowchart is the unit of work. A failure on a single unit (render
//! timeout, missing artifact, recognition failure) is logged and the unit is
//! skipped; the batch itself never aborts.

use crate::chart::{FlowchartBuilder, FlowchartStatistics};
use crate::config::RunConfig;
use crate::error::DatasetError;
use crate::ocr::{OcrStore, TextRecognizer};
use crate::question::IMG_PLACEHOLDER;
use crate::render::Renderer;
use crate::sample::{Sample, SampleBuilder, SampleCollector, SampleStatistics};
use crate::sampling::NAME_ALPHABET;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use tracing::{info, warn};

/// Outcome counts of the external rendering pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderReport {
    pub rendered: usize,
    pub failed: usize,
}

/// Whether all per-chart artifacts required for sample assembly exist: the
/// diagram script, the serialized flowchart, and (when rendering is on) the
/// image.
pub fn check_integrity(config: &RunConfig, chart_id: usize) -> bool {
    let core = config.mmd_path(chart_id).exists() && config.chart_path(chart_id).exists();
    if config.render_images {
        core && config.img_path(chart_id).exists()
    } else {
        core
    }
}

/// Generates the batch of flowcharts: serialized charts plus diagram
/// scripts, with the shape-statistics report, and (when enabled) the
/// rendering pass.
pub fn generate_flowcharts<R: Rng + ?Sized>(
    config: &RunConfig,
    rng: &mut R,
) -> Result<FlowchartStatistics, DatasetError> {
    for dir in [
        config.mmd_dir(),
        config.chart_dir(),
        config.img_dir(),
        config.stats_dir(),
    ] {
        fs::create_dir_all(dir)?;
    }

    let builder = FlowchartBuilder::new(config.max_node_num);
    let mut statistics = FlowchartStatistics::new();
    for chart_id in 0..config.flowchart_num {
        let chart = builder.build(rng);
        statistics.add_flowchart(&chart);
        chart.save_mermaid(config.mmd_path(chart_id), rng)?;
        chart.save(config.chart_path(chart_id))?;
    }
    info!(count = config.flowchart_num, "generated flowcharts");

    if config.render_images {
        render_images(config, &Renderer::default());
    }

    statistics.save(config.flowchart_stats_path())?;
    Ok(statistics)
}

/// Renders every generated diagram script to an image. Per-item failures
/// are logged and skipped; the report carries the final counts.
pub fn render_images(config: &RunConfig, renderer: &Renderer) -> RenderReport {
    let mut report = RenderReport::default();
    for chart_id in 0..config.flowchart_num {
        match renderer.render(&config.mmd_path(chart_id), &config.img_path(chart_id)) {
            Ok(()) => {
                report.rendered += 1;
                info!(chart_id, rendered = report.rendered, "image generated");
            }
            Err(e) => {
                report.failed += 1;
                warn!(chart_id, error = %e, "image generation failed");
            }
        }
    }
    info!(
        rendered = report.rendered,
        failed = report.failed,
        "rendering pass finished"
    );
    report
}

/// Runs the text-recognition collaborator over every rendered image and
/// persists the filtered context store. A failed recognition yields an
/// empty context for that chart.
pub fn generate_ocr_contents<T: TextRecognizer + ?Sized>(
    config: &RunConfig,
    recognizer: &T,
) -> Result<OcrStore, DatasetError> {
    let mut fragments = Vec::with_capacity(config.flowchart_num);
    for chart_id in 0..config.flowchart_num {
        match recognizer.recognize(&config.img_path(chart_id), NAME_ALPHABET) {
            Ok(found) => fragments.push(found),
            Err(e) => {
                warn!(chart_id, error = %e, "text recognition failed");
                fragments.push(Vec::new());
            }
        }
    }
    let store = OcrStore::from_fragments(fragments, config.min_confidence);
    store.save(config.ocr_results_path())?;
    Ok(store)
}

/// Assembles the sample battery for every flowchart that passed the
/// integrity check, then writes the training dataset, the evaluation
/// dataset, the question/ground-truth files, and the statistics report.
pub fn generate_samples<R: Rng + ?Sized>(
    config: &RunConfig,
    ocr: Option<&OcrStore>,
    rng: &mut R,
) -> Result<SampleStatistics, DatasetError> {
    fs::create_dir_all(config.qa_dir())?;
    fs::create_dir_all(config.stats_dir())?;

    let mut collector = SampleCollector::new(0);
    let mut statistics = SampleStatistics::new(config.max_node_num);
    let mut skipped = 0usize;
    for chart_id in 0..config.flowchart_num {
        match SampleBuilder::from_artifacts(config, chart_id, collector.next_id(), ocr) {
            Ok(mut builder) => {
                builder.build_all(rng);
                let built = builder.into_collector();
                for sample in built.samples() {
                    statistics.add_sample(sample);
                }
                collector.extend(built.into_samples());
            }
            Err(e) => {
                skipped += 1;
                warn!(chart_id, error = %e, "skipping flowchart");
            }
        }
    }
    info!(
        samples = collector.len(),
        skipped, "sample assembly finished"
    );

    write_datasets(config, collector.samples())?;
    write_qa_files(config)?;
    statistics.save(config.conversation_stats_path())?;
    Ok(statistics)
}

/// Writes the conversation-only training dataset and the extended
/// evaluation dataset.
fn write_datasets(config: &RunConfig, samples: &[Sample]) -> Result<(), DatasetError> {
    let training = samples
        .iter()
        .map(Sample::training_record)
        .collect::<Vec<_>>();
    fs::write(
        config.conversations_path(),
        serde_json::to_string_pretty(&training)?,
    )?;

    let evaluation = samples
        .iter()
        .map(Sample::evaluation_record)
        .collect::<Vec<_>>();
    fs::write(
        config.conversations_qa_path(),
        serde_json::to_string_pretty(&evaluation)?,
    )?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct QaRecord {
    id: usize,
    image: String,
    conversations: Vec<crate::sample::Message>,
    #[serde(rename = "type")]
    question_type: u8,
    ground_truth: Vec<String>,
}

#[derive(Debug, Serialize)]
struct QuestionLine<'a> {
    question_id: usize,
    image: &'a str,
    text: String,
    #[serde(rename = "type")]
    question_type: u8,
}

#[derive(Debug, Serialize)]
struct GroundTruthLine<'a> {
    question_id: usize,
    ground_truth: &'a [String],
}

/// Derives the line-delimited question and ground-truth files from the
/// evaluation dataset on disk, stripping the image placeholder from each
/// question text.
fn write_qa_files(config: &RunConfig) -> Result<(), DatasetError> {
    let records: Vec<QaRecord> =
        serde_json::from_str(&fs::read_to_string(config.conversations_qa_path())?)?;

    let mut questions = fs::File::create(config.questions_path())?;
    let mut ground_truths = fs::File::create(config.ground_truths_path())?;
    for record in &records {
        for message in &record.conversations {
            if message.from == "human" {
                let line = QuestionLine {
                    question_id: record.id,
                    image: &record.image,
                    text: message.value.replace(IMG_PLACEHOLDER, ""),
                    question_type: record.question_type,
                };
                writeln!(questions, "{}", serde_json::to_string(&line)?)?;
            }
        }
        let line = GroundTruthLine {
            question_id: record.id,
            ground_truth: &record.ground_truth,
        };
        writeln!(ground_truths, "{}", serde_json::to_string(&line)?)?;
    }
    Ok(())
}

/// Runs the whole pipeline: validation, flowchart generation (with optional
/// rendering), recognized-text context, and sample assembly.
///
/// When `use_ocr` is set and no recognizer is supplied, a previously
/// persisted context store is loaded if one exists; otherwise questions are
/// built without context blocks.
pub fn run_pipeline<R: Rng + ?Sized>(
    config: &RunConfig,
    recognizer: Option<&dyn TextRecognizer>,
    rng: &mut R,
) -> Result<(FlowchartStatistics, SampleStatistics), DatasetError> {
    config.validate()?;

    let chart_statistics = generate_flowcharts(config, rng)?;

    let ocr_store = if config.use_ocr {
        match recognizer {
            Some(recognizer) => Some(generate_ocr_contents(config, recognizer)?),
            None => match OcrStore::load(config.ocr_results_path()) {
                Ok(store) => Some(store),
                Err(e) => {
                    warn!(error = %e, "no recognized-text store available, continuing without");
                    None
                }
            },
        }
    } else {
        None
    };

    let sample_statistics = generate_samples(config, ocr_store.as_ref(), rng)?;
    Ok((chart_statistics, sample_statistics))
}
