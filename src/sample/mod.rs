//! Training/eval records and their assembly from flowchart queries.

use crate::question::QuestionType;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod collector;
pub mod statistics;

pub use builder::SampleBuilder;
pub use collector::SampleCollector;
pub use statistics::SampleStatistics;

pub const YES_ANSWER: &str = "yes";
pub const NO_ANSWER: &str = "no";
pub const NONE_ANSWER: &str = "none";

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub value: String,
}

/// Pairs a human question with the assistant answer.
pub fn conversation(human_text: String, gpt_text: String) -> Vec<Message> {
    vec![
        Message {
            from: "human".to_string(),
            value: human_text,
        },
        Message {
            from: "gpt".to_string(),
            value: gpt_text,
        },
    ]
}

/// The bare (non-reasoning) answer form: comma-joined tokens, or `none`.
pub fn simple_answer(tokens: &[String]) -> String {
    if tokens.is_empty() {
        NONE_ANSWER.to_string()
    } else {
        tokens.iter().join(", ")
    }
}

/// One labeled question/answer record.
///
/// Created once per query and never mutated. `id` is assigned by the
/// collector and is unique across a whole generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: usize,
    /// Image path relative to the run directory.
    pub image: String,
    pub conversations: Vec<Message>,
    pub question_type: QuestionType,
    /// Canonical answer tokens: state names, or `yes`/`no`.
    pub ground_truth: Vec<String>,
    /// Length of the queried sequence; 0 when not applicable.
    pub sequence_len: usize,
}

/// Serialized projection used for the training dataset.
#[derive(Debug, Serialize)]
pub struct TrainingRecord<'a> {
    pub id: usize,
    pub image: &'a str,
    pub conversations: &'a [Message],
}

/// Serialized projection used for the evaluation dataset: the training
/// record plus the question type code, ground truth, and sequence length.
#[derive(Debug, Serialize)]
pub struct EvaluationRecord<'a> {
    pub id: usize,
    pub image: &'a str,
    pub conversations: &'a [Message],
    #[serde(rename = "type")]
    pub question_type: u8,
    pub ground_truth: &'a [String],
    pub sequence_len: usize,
}

impl Sample {
    pub fn training_record(&self) -> TrainingRecord<'_> {
        TrainingRecord {
            id: self.id,
            image: &self.image,
            conversations: &self.conversations,
        }
    }

    pub fn evaluation_record(&self) -> EvaluationRecord<'_> {
        EvaluationRecord {
            id: self.id,
            image: &self.image,
            conversations: &self.conversations,
            question_type: self.question_type.code(),
            ground_truth: &self.ground_truth,
            sequence_len: self.sequence_len,
        }
    }
}
