//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the nagarezu crate. Import
//! this module to get access to the core functionality without having to
//! import each type individually.

// Graph model and generation
pub use crate::chart::{
    AdjacencyMatrix, ChartKind, Edge, EdgeLabel, Flowchart, FlowchartBuilder,
    FlowchartStatistics, NO_ID, NodeData, NodeKind, YES_ID,
};

// Querying and narration
pub use crate::query::QuerySolver;
pub use crate::question::{Question, QuestionType};
pub use crate::trace::TraceBuilder;

// Sample assembly
pub use crate::sample::{Sample, SampleBuilder, SampleCollector, SampleStatistics};

// Pipeline surface
pub use crate::config::RunConfig;
pub use crate::ocr::{OcrStore, TextFragment, TextRecognizer};
pub use crate::render::Renderer;

// Error types
pub use crate::error::{ConfigError, DatasetError, RenderError, StoreError};
