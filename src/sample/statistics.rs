use super::{Sample, YES_ANSWER};
use crate::error::StoreError;
use crate::question::QuestionType;
use std::fs;
use std::path::Path;

/// Running per-type tallies over the samples of one generation run.
///
/// Histograms are indexed by answer cardinality (ALLNEXT/ALLPREV) or by
/// sequence length (VALID) and sized `max_node_num + 1` so a full-length
/// sequence stays in range. Purely observational.
#[derive(Debug)]
pub struct SampleStatistics {
    nextok_yes: usize,
    nextok_no: usize,
    allnext: Vec<usize>,
    prev: Vec<usize>,
    cond: usize,
    valid_yes: usize,
    valid_no: usize,
    valid_len: Vec<usize>,
}

impl SampleStatistics {
    pub fn new(max_node_num: usize) -> Self {
        Self {
            nextok_yes: 0,
            nextok_no: 0,
            allnext: vec![0; max_node_num + 1],
            prev: vec![0; max_node_num + 1],
            cond: 0,
            valid_yes: 0,
            valid_no: 0,
            valid_len: vec![0; max_node_num + 1],
        }
    }

    pub fn add_sample(&mut self, sample: &Sample) {
        match sample.question_type {
            QuestionType::NextOk => {
                if sample.ground_truth.first().map(String::as_str) == Some(YES_ANSWER) {
                    self.nextok_yes += 1;
                } else {
                    self.nextok_no += 1;
                }
            }
            QuestionType::AllNext => self.allnext[sample.ground_truth.len()] += 1,
            QuestionType::AllPrev => self.prev[sample.ground_truth.len()] += 1,
            QuestionType::Cond => self.cond += 1,
            QuestionType::Valid => {
                if sample.ground_truth.first().map(String::as_str) == Some(YES_ANSWER) {
                    self.valid_yes += 1;
                } else {
                    self.valid_no += 1;
                }
                self.valid_len[sample.sequence_len] += 1;
            }
        }
    }

    pub fn nextok_num(&self) -> usize {
        self.nextok_yes + self.nextok_no
    }

    pub fn allnext_num(&self) -> usize {
        self.allnext.iter().sum()
    }

    pub fn prev_num(&self) -> usize {
        self.prev.iter().sum()
    }

    pub fn cond_num(&self) -> usize {
        self.cond
    }

    pub fn valid_num(&self) -> usize {
        self.valid_yes + self.valid_no
    }

    pub fn all_num(&self) -> usize {
        self.nextok_num() + self.allnext_num() + self.prev_num() + self.cond_num()
            + self.valid_num()
    }

    fn show_nextok(&self) -> String {
        format!(
            "--- nextok ---\nyes: {}\nno: {}\nall: {}",
            self.nextok_yes,
            self.nextok_no,
            self.nextok_num()
        )
    }

    fn show_allnext(&self) -> String {
        format!(
            "--- allnext ---\n{:?}\nall: {}",
            trim_trailing_zeros(&self.allnext),
            self.allnext_num()
        )
    }

    fn show_prev(&self) -> String {
        format!(
            "--- prev ---\n{:?}\nall: {}",
            trim_trailing_zeros(&self.prev),
            self.prev_num()
        )
    }

    fn show_cond(&self) -> String {
        format!("--- cond ---\nall: {}", self.cond_num())
    }

    fn show_valid(&self) -> String {
        format!(
            "--- valid ---\n{:?}\nyes: {}\nno: {}\nall: {}",
            trim_trailing_zeros(&self.valid_len),
            self.valid_yes,
            self.valid_no,
            self.valid_num()
        )
    }

    /// The complete human-readable report.
    pub fn show_all(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n--- all ---\n{}",
            self.show_nextok(),
            self.show_allnext(),
            self.show_prev(),
            self.show_cond(),
            self.show_valid(),
            self.all_num()
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        fs::write(path, self.show_all()).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Cuts a histogram down to its last non-zero entry (keeping index 0).
fn trim_trailing_zeros(histogram: &[usize]) -> &[usize] {
    let last_non_zero = histogram
        .iter()
        .rposition(|&count| count != 0)
        .unwrap_or(0);
    &histogram[..=last_non_zero]
}
