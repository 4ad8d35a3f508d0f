//! Draws the per-flowchart query battery and assembles samples.

use super::{NO_ANSWER, Sample, SampleCollector, YES_ANSWER, conversation, simple_answer};
use crate::chart::{AdjacencyMatrix, ChartKind, Flowchart, NO_ID, NodeData, NodeKind, YES_ID};
use crate::config::RunConfig;
use crate::dataset::check_integrity;
use crate::error::DatasetError;
use crate::ocr::OcrStore;
use crate::query::QuerySolver;
use crate::question::Question;
use crate::sampling::normal_int;
use crate::trace::TraceBuilder;
use rand::Rng;
use rand::seq::{IndexedRandom, index};

/// Initial probability that the constructive walk stops after a step; grows
/// by the factor below with every extension.
pub const WALK_STOP_PROB: f64 = 0.1;
pub const WALK_STOP_GROWTH: f64 = 1.6;

/// Length distribution of the independently drawn sequence for the second
/// VALID sample.
pub const SEQ_LEN_MEAN: f64 = 3.0;
pub const SEQ_LEN_STD: f64 = 0.8;

/// Sequences shorter than this are not asked about.
pub const MIN_SEQ_LEN: usize = 3;

/// Builds the sample battery for one flowchart: two NEXTOK samples (one
/// reachable, one not), two ALLNEXT, two ALLPREV, two VALID (one constructed
/// walk, one random draw), and one COND sample per decision node.
///
/// Every answer is computed through [`QuerySolver`], never assumed from the
/// way the query was drawn.
pub struct SampleBuilder {
    image: String,
    use_cot: bool,
    ocr_content: Option<String>,
    kind: ChartKind,
    matrix: AdjacencyMatrix,
    nodes: Vec<NodeData>,
    collector: SampleCollector,
}

impl SampleBuilder {
    /// Builds directly from an in-memory flowchart.
    pub fn new(
        image: String,
        chart: &Flowchart,
        base_id: usize,
        use_cot: bool,
        ocr_content: Option<String>,
    ) -> Self {
        Self {
            image,
            use_cot,
            ocr_content,
            kind: chart.kind(),
            matrix: chart.matrix(),
            nodes: chart.node_data(),
            collector: SampleCollector::new(base_id),
        }
    }

    /// Loads the persisted flowchart for `chart_id` after verifying that all
    /// of its artifacts exist. A missing artifact is fatal for this chart
    /// only; the caller decides whether to skip or abort.
    pub fn from_artifacts(
        config: &RunConfig,
        chart_id: usize,
        base_id: usize,
        ocr: Option<&OcrStore>,
    ) -> Result<Self, DatasetError> {
        if !check_integrity(config, chart_id) {
            return Err(DatasetError::MissingArtifacts { chart_id });
        }
        let chart = Flowchart::load(config.chart_path(chart_id))?;
        let ocr_content = ocr
            .and_then(|store| store.content(chart_id))
            .map(str::to_string);
        Ok(Self::new(
            config.image_ref(chart_id),
            &chart,
            base_id,
            config.use_cot,
            ocr_content,
        ))
    }

    /// Draws the full battery for this flowchart.
    pub fn build_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.build_nextok_samples(rng);
        self.build_allnext_samples(rng);
        self.build_allprev_samples(rng);
        self.build_valid_samples(rng);
        if self.kind == ChartKind::Decision {
            self.build_cond_samples(rng);
        }
    }

    pub fn into_collector(self) -> SampleCollector {
        self.collector
    }

    fn node_count(&self) -> usize {
        self.matrix.size()
    }

    fn name(&self, id: usize) -> &str {
        &self.nodes[id].name
    }

    fn names(&self, ids: &[usize]) -> Vec<String> {
        ids.iter().map(|&id| self.nodes[id].name.clone()).collect()
    }

    fn push_sample(
        &mut self,
        question: Question,
        answer: String,
        ground_truth: Vec<String>,
        sequence_len: usize,
    ) {
        let question_type = question.question_type();
        let question_text = question.build(self.use_cot, self.ocr_content.as_deref());
        self.collector.append(Sample {
            id: self.collector.next_id(),
            image: self.image.clone(),
            conversations: conversation(question_text, answer),
            question_type,
            ground_truth,
            sequence_len,
        });
    }

    fn build_nextok_samples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let node_count = self.node_count();

        // Reachable case: the source pool excludes the last id, so at least
        // one successor always exists.
        let cur_id = rng.random_range(0..node_count - 1);
        let (next_id, next_states, reachable) = {
            let solver = QuerySolver::new(&self.matrix);
            let successors = solver.all_next(cur_id);
            let next_id = *successors
                .choose(rng)
                .expect("non-terminal nodes always have at least one successor");
            (
                next_id,
                self.names(&successors),
                solver.next_ok(cur_id, next_id),
            )
        };
        if reachable {
            let cur_state = self.name(cur_id).to_string();
            let next_state = self.name(next_id).to_string();
            let answer = if self.use_cot {
                TraceBuilder::nextok(&cur_state, &next_state, &next_states, true)
            } else {
                YES_ANSWER.to_string()
            };
            self.push_sample(
                Question::NextOk {
                    cur_state,
                    next_state,
                },
                answer,
                vec![YES_ANSWER.to_string()],
                0,
            );
        }

        // Unreachable case: prefer a confirmed non-successor, fall back to
        // any id; the sample is only emitted if the solver agrees.
        let cur_id = rng.random_range(0..node_count);
        let (next_id, next_states, reachable) = {
            let solver = QuerySolver::new(&self.matrix);
            let non_successors = (0..node_count)
                .filter(|&to| to != cur_id && !solver.next_ok(cur_id, to))
                .collect::<Vec<_>>();
            let next_id = non_successors
                .choose(rng)
                .copied()
                .unwrap_or_else(|| rng.random_range(0..node_count));
            (
                next_id,
                self.names(&solver.all_next(cur_id)),
                solver.next_ok(cur_id, next_id),
            )
        };
        if !reachable {
            let cur_state = self.name(cur_id).to_string();
            let next_state = self.name(next_id).to_string();
            let answer = if self.use_cot {
                TraceBuilder::nextok(&cur_state, &next_state, &next_states, false)
            } else {
                NO_ANSWER.to_string()
            };
            self.push_sample(
                Question::NextOk {
                    cur_state,
                    next_state,
                },
                answer,
                vec![NO_ANSWER.to_string()],
                0,
            );
        }
    }

    fn build_allnext_samples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let cur_ids = index::sample(rng, self.node_count(), 2);
        for cur_id in cur_ids.iter() {
            let next_ids = QuerySolver::new(&self.matrix).all_next(cur_id);
            let next_states = self.names(&next_ids);
            let cur_state = self.name(cur_id).to_string();
            let answer = if self.use_cot {
                TraceBuilder::allnext(&cur_state, &next_states)
            } else {
                simple_answer(&next_states)
            };
            self.push_sample(
                Question::AllNext { cur_state },
                answer,
                next_states,
                0,
            );
        }
    }

    fn build_allprev_samples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        // Targets are drawn from 1..node_count; id 0 is never asked about.
        let cur_ids = index::sample(rng, self.node_count() - 1, 2);
        for offset in cur_ids.iter() {
            let cur_id = offset + 1;
            let prev_ids = QuerySolver::new(&self.matrix).all_prev(cur_id);
            let prev_states = self.names(&prev_ids);
            let cur_state = self.name(cur_id).to_string();
            let answer = if self.use_cot {
                TraceBuilder::allprev(&cur_state, &prev_states)
            } else {
                simple_answer(&prev_states)
            };
            self.push_sample(
                Question::AllPrev { cur_state },
                answer,
                prev_states,
                0,
            );
        }
    }

    fn build_cond_samples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let node_count = self.node_count();
        for cur_id in 0..node_count {
            if self.nodes[cur_id].kind != NodeKind::Decision {
                continue;
            }
            let value_id = if rng.random_bool(0.5) { YES_ID } else { NO_ID };
            let value = if value_id == YES_ID { "true" } else { "false" };

            let (branches, cond_states) = {
                let solver = QuerySolver::new(&self.matrix);
                let branches = (0..node_count)
                    .filter(|&to| to != cur_id)
                    .filter_map(|to| match self.matrix.get(cur_id, to) {
                        YES_ID => Some(("true".to_string(), self.name(to).to_string())),
                        NO_ID => Some(("false".to_string(), self.name(to).to_string())),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                let cond_states = self.names(&solver.cond_next(cur_id, value_id));
                (branches, cond_states)
            };
            if cond_states.is_empty() {
                continue;
            }

            let cur_state = self.name(cur_id).to_string();
            let answer = if self.use_cot {
                TraceBuilder::cond(&cur_state, value, &branches)
            } else {
                simple_answer(&cond_states)
            };
            self.push_sample(
                Question::Cond {
                    cur_state,
                    value: value.to_string(),
                },
                answer,
                cond_states,
                0,
            );
        }
    }

    fn build_valid_samples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let node_count = self.node_count();

        // Constructed walk: starts in the first half of the id space and only
        // ever takes matrix-confirmed edges, so it is valid by construction.
        let mut cur_id = rng.random_range(0..node_count / 2);
        let mut sequence = vec![cur_id];
        let mut stop_prob = WALK_STOP_PROB;
        loop {
            if rng.random::<f64>() <= stop_prob && sequence.len() >= MIN_SEQ_LEN {
                break;
            }
            let next_id = {
                let solver = QuerySolver::new(&self.matrix);
                (0..node_count)
                    .filter(|&to| solver.next_ok(cur_id, to) && !sequence.contains(&to))
                    .collect::<Vec<_>>()
                    .choose(rng)
                    .copied()
            };
            match next_id {
                Some(next_id) => {
                    sequence.push(next_id);
                    cur_id = next_id;
                    stop_prob *= WALK_STOP_GROWTH;
                }
                None => break,
            }
        }
        let confirmed = QuerySolver::new(&self.matrix).is_valid_sequence(&sequence);
        if sequence.len() >= MIN_SEQ_LEN && confirmed {
            self.push_valid_sample(&sequence, true);
        }

        // Independent random draw: validity is computed, not assumed, and the
        // label follows whatever the solver returns.
        let length = normal_int(
            rng,
            SEQ_LEN_MEAN,
            SEQ_LEN_STD,
            MIN_SEQ_LEN as i64,
            node_count as i64,
        ) as usize;
        let sequence = index::sample(rng, node_count, length)
            .iter()
            .collect::<Vec<_>>();
        let is_valid = QuerySolver::new(&self.matrix).is_valid_sequence(&sequence);
        self.push_valid_sample(&sequence, is_valid);
    }

    fn push_valid_sample(&mut self, sequence: &[usize], is_valid: bool) {
        let sequence_states = self.names(sequence);
        let transitions_ok = {
            let solver = QuerySolver::new(&self.matrix);
            sequence
                .windows(2)
                .map(|pair| solver.next_ok(pair[0], pair[1]))
                .collect::<Vec<_>>()
        };
        let verdict = if is_valid { YES_ANSWER } else { NO_ANSWER };
        let answer = if self.use_cot {
            TraceBuilder::valid(&sequence_states, &transitions_ok)
        } else {
            verdict.to_string()
        };
        self.push_sample(
            Question::Valid {
                sequence: sequence_states.join("->"),
            },
            answer,
            vec![verdict.to_string()],
            sequence.len(),
        );
    }
}
