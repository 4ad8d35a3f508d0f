use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Hard ceiling on nodes per flowchart: display codes are single letters
/// `A..Z`, so more than 26 nodes cannot be rendered.
pub const DISPLAY_CODE_LIMIT: usize = 26;

/// Smallest node count for which edge generation is always feasible.
pub const MIN_NODE_NUM: usize = 3;

/// Default maximum node count per flowchart.
pub const DEFAULT_MAX_NODE_NUM: usize = 25;

/// Default confidence floor for recognized text fragments.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

pub const CONVERSATIONS_FILE: &str = "conversations.json";
pub const CONVERSATIONS_QA_FILE: &str = "conversations_qa.json";
pub const QUESTIONS_FILE: &str = "questions.jsonl";
pub const GROUND_TRUTHS_FILE: &str = "ground_truths.jsonl";
pub const OCR_RESULTS_FILE: &str = "ocr_results.bin";
pub const FLOWCHART_STATS_FILE: &str = "flowchart_statistics.txt";
pub const CONVERSATION_STATS_FILE: &str = "conversation_statistics.txt";

/// Static parameters of one generation run.
///
/// Everything here is fixed before the batch starts; nothing is mutated at
/// runtime. The directory accessors describe the on-disk layout of a run:
///
/// ```text
/// <data_root>/<run_id>/
///   mmd/         diagram scripts, one per flowchart
///   charts/      serialized flowcharts, one per flowchart
///   img/         rendered images
///   qa/          evaluation records and question/ground-truth files
///   stats/       per-batch statistics reports
///   conversations.json
///   ocr_results.bin
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Identifier for this generation run, used as a directory name.
    pub run_id: String,
    /// Number of flowcharts to generate.
    pub flowchart_num: usize,
    /// Maximum node count per flowchart, within `[3, 26]`.
    pub max_node_num: usize,
    /// Whether to invoke the external renderer for each diagram script.
    pub render_images: bool,
    /// Whether to attach recognized-text context blocks to questions.
    pub use_ocr: bool,
    /// Whether answers carry a step-by-step reasoning trace.
    pub use_cot: bool,
    /// Confidence floor for recognized text fragments.
    pub min_confidence: f64,
    /// Root directory for all generated runs.
    pub data_root: PathBuf,
    /// Seed for the run's random generator.
    pub seed: u64,
}

impl RunConfig {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            flowchart_num: 5,
            max_node_num: DEFAULT_MAX_NODE_NUM,
            render_images: true,
            use_ocr: true,
            use_cot: true,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            data_root: PathBuf::from("data"),
            seed: 42,
        }
    }

    /// Checks the configuration before any generation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_node_num < MIN_NODE_NUM || self.max_node_num > DISPLAY_CODE_LIMIT {
            return Err(ConfigError::NodeLimitOutOfRange {
                requested: self.max_node_num,
                min: MIN_NODE_NUM,
                max: DISPLAY_CODE_LIMIT,
            });
        }
        if self.flowchart_num == 0 {
            return Err(ConfigError::EmptyBatch);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidConfidence(self.min_confidence));
        }
        Ok(())
    }

    pub fn run_dir(&self) -> PathBuf {
        self.data_root.join(&self.run_id)
    }

    pub fn mmd_dir(&self) -> PathBuf {
        self.run_dir().join("mmd")
    }

    pub fn chart_dir(&self) -> PathBuf {
        self.run_dir().join("charts")
    }

    pub fn img_dir(&self) -> PathBuf {
        self.run_dir().join("img")
    }

    pub fn qa_dir(&self) -> PathBuf {
        self.run_dir().join("qa")
    }

    pub fn stats_dir(&self) -> PathBuf {
        self.run_dir().join("stats")
    }

    pub fn mmd_path(&self, chart_id: usize) -> PathBuf {
        self.mmd_dir().join(format!("{chart_id}.mmd"))
    }

    pub fn chart_path(&self, chart_id: usize) -> PathBuf {
        self.chart_dir().join(format!("{chart_id}.chart"))
    }

    pub fn img_path(&self, chart_id: usize) -> PathBuf {
        self.img_dir().join(format!("{chart_id}.png"))
    }

    /// The image path as referenced from inside conversation records,
    /// relative to the run directory.
    pub fn image_ref(&self, chart_id: usize) -> String {
        format!("img/{chart_id}.png")
    }

    pub fn conversations_path(&self) -> PathBuf {
        self.run_dir().join(CONVERSATIONS_FILE)
    }

    pub fn conversations_qa_path(&self) -> PathBuf {
        self.qa_dir().join(CONVERSATIONS_QA_FILE)
    }

    pub fn questions_path(&self) -> PathBuf {
        self.qa_dir().join(QUESTIONS_FILE)
    }

    pub fn ground_truths_path(&self) -> PathBuf {
        self.qa_dir().join(GROUND_TRUTHS_FILE)
    }

    pub fn ocr_results_path(&self) -> PathBuf {
        self.run_dir().join(OCR_RESULTS_FILE)
    }

    pub fn flowchart_stats_path(&self) -> PathBuf {
        self.stats_dir().join(FLOWCHART_STATS_FILE)
    }

    pub fn conversation_stats_path(&self) -> PathBuf {
        self.stats_dir().join(CONVERSATION_STATS_FILE)
    }

    /// Replaces the data root, keeping everything else. Mostly useful for
    /// pointing a run at a scratch directory.
    pub fn with_data_root(mut self, root: impl AsRef<Path>) -> Self {
        self.data_root = root.as_ref().to_path_buf();
        self
    }
}
