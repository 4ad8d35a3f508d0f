//! End-to-end tests: sample assembly, collector id assignment, the OCR
//! context store, and full pipeline runs into a scratch directory.
mod common;
use common::{decision_chart, normal_chart};
use nagarezu::dataset;
use nagarezu::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::fs;

fn sample_stub(id_hint: usize) -> Sample {
    Sample {
        id: id_hint,
        image: "img/0.png".to_string(),
        conversations: nagarezu::sample::conversation("q".to_string(), "a".to_string()),
        question_type: QuestionType::Cond,
        ground_truth: vec!["x".to_string()],
        sequence_len: 0,
    }
}

#[test]
fn test_collector_assigns_offset_ids() {
    let mut collector = SampleCollector::new(100);
    for _ in 0..5 {
        let id = collector.next_id();
        collector.append(sample_stub(id));
    }
    let ids: Vec<usize> = collector.samples().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![100, 101, 102, 103, 104]);
    assert_eq!(collector.next_id(), 105);
}

#[test]
fn test_battery_for_decision_chart() {
    let chart = decision_chart();
    let mut builder =
        SampleBuilder::new("img/0.png".to_string(), &chart, 0, true, None);
    let mut rng = StdRng::seed_from_u64(3);
    builder.build_all(&mut rng);
    let samples = builder.into_collector().into_samples();

    // Ids are consecutive from the base.
    for (index, sample) in samples.iter().enumerate() {
        assert_eq!(sample.id, index);
        assert_eq!(sample.image, "img/0.png");
        assert_eq!(sample.conversations.len(), 2);
        assert_eq!(sample.conversations[0].from, "human");
        assert_eq!(sample.conversations[1].from, "gpt");
        assert!(sample.conversations[0].value.starts_with("<image>\n"));
    }

    let count_of = |t: QuestionType| samples.iter().filter(|s| s.question_type == t).count();
    // NEXTOK and VALID may each drop a draw; ALLNEXT/ALLPREV always fire twice.
    assert!(count_of(QuestionType::NextOk) <= 2);
    assert_eq!(count_of(QuestionType::AllNext), 2);
    assert_eq!(count_of(QuestionType::AllPrev), 2);
    assert!((1..=2).contains(&count_of(QuestionType::Valid)));
    // One COND sample per decision node; the fixture has one.
    assert_eq!(count_of(QuestionType::Cond), 1);

    for sample in &samples {
        match sample.question_type {
            QuestionType::NextOk | QuestionType::Valid => {
                assert!(matches!(sample.ground_truth[0].as_str(), "yes" | "no"));
            }
            QuestionType::Cond => {
                assert!(!sample.ground_truth.is_empty());
            }
            _ => {}
        }
        if sample.question_type == QuestionType::Valid {
            assert!(sample.sequence_len >= 3);
        } else {
            assert_eq!(sample.sequence_len, 0);
        }
    }
}

#[test]
fn test_battery_ground_truth_matches_engine() {
    // Unique node names let us map answer tokens back to ids.
    let chart = normal_chart();
    let matrix = chart.matrix();
    let solver = QuerySolver::new(&matrix);
    let nodes = chart.node_data();
    let id_of = |name: &str| nodes.iter().position(|n| n.name == name).expect("known name");

    let mut builder =
        SampleBuilder::new("img/0.png".to_string(), &chart, 0, true, None);
    let mut rng = StdRng::seed_from_u64(11);
    builder.build_all(&mut rng);

    for sample in builder.into_collector().samples() {
        if sample.question_type == QuestionType::AllNext {
            // Recover the queried state from the question text.
            let text = &sample.conversations[0].value;
            let cur = nodes
                .iter()
                .find(|n| text.contains(&format!("current state is {}", n.name)))
                .expect("queried state in question");
            let expected: Vec<String> = solver
                .all_next(cur.id)
                .into_iter()
                .map(|id| nodes[id].name.clone())
                .collect();
            assert_eq!(sample.ground_truth, expected);
            for token in &sample.ground_truth {
                assert!(solver.next_ok(cur.id, id_of(token)));
            }
        }
    }
}

#[test]
fn test_battery_without_cot_uses_bare_answers() {
    let chart = normal_chart();
    let mut builder =
        SampleBuilder::new("img/0.png".to_string(), &chart, 0, false, None);
    let mut rng = StdRng::seed_from_u64(5);
    builder.build_all(&mut rng);

    for sample in builder.into_collector().samples() {
        let answer = &sample.conversations[1].value;
        assert!(!answer.contains("Step 1"));
        // The question still ends without a chain-of-thought prompt.
        assert!(!sample.conversations[0].value.contains("Please first"));
    }
}

#[test]
fn test_ocr_content_is_appended_to_questions() {
    let chart = normal_chart();
    let context = "[OCR] Node List: fetch, parse, store, report.".to_string();
    let mut builder =
        SampleBuilder::new("img/0.png".to_string(), &chart, 0, true, Some(context.clone()));
    let mut rng = StdRng::seed_from_u64(5);
    builder.build_all(&mut rng);

    let samples = builder.into_collector().into_samples();
    assert!(!samples.is_empty());
    for sample in &samples {
        assert!(sample.conversations[0].value.ends_with(&context));
    }
}

#[test]
fn test_ocr_store_filters_and_round_trips() {
    let fragments = vec![
        vec![
            TextFragment {
                text: "alpha".to_string(),
                confidence: 0.95,
            },
            TextFragment {
                text: "y".to_string(),
                confidence: 0.99,
            },
            TextFragment {
                text: "blurry".to_string(),
                confidence: 0.2,
            },
        ],
        vec![TextFragment {
            text: "n".to_string(),
            confidence: 0.9,
        }],
    ];
    let store = OcrStore::from_fragments(fragments, 0.7);
    assert_eq!(store.len(), 2);
    assert_eq!(store.content(0), Some("[OCR] Node List: alpha."));
    assert_eq!(store.content(1), Some("[OCR] Node List: ."));
    assert_eq!(store.content(2), None);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ocr_results.bin");
    store.save(&path).expect("save");
    assert_eq!(OcrStore::load(&path).expect("load"), store);
}

#[test]
fn test_sample_statistics_tallies() {
    let chart = decision_chart();
    let mut builder =
        SampleBuilder::new("img/0.png".to_string(), &chart, 0, true, None);
    let mut rng = StdRng::seed_from_u64(21);
    builder.build_all(&mut rng);
    let samples = builder.into_collector().into_samples();

    let mut stats = SampleStatistics::new(25);
    for sample in &samples {
        stats.add_sample(sample);
    }
    assert_eq!(stats.all_num(), samples.len());

    let report = stats.show_all();
    assert!(report.contains("--- nextok ---"));
    assert!(report.contains("--- cond ---"));
    assert!(report.contains("--- all ---"));
}

fn scratch_config(root: &std::path::Path, seed: u64) -> RunConfig {
    let mut config = RunConfig::new("testrun").with_data_root(root);
    config.flowchart_num = 6;
    config.render_images = false;
    config.use_ocr = false;
    config.seed = seed;
    config
}

#[test]
fn test_full_pipeline_writes_all_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = scratch_config(dir.path(), 42);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let (chart_stats, sample_stats) =
        dataset::run_pipeline(&config, None, &mut rng).expect("pipeline");
    assert_eq!(chart_stats.total(), 6);
    assert!(sample_stats.all_num() > 0);

    for chart_id in 0..6 {
        assert!(config.mmd_path(chart_id).exists());
        assert!(config.chart_path(chart_id).exists());
        let script = fs::read_to_string(config.mmd_path(chart_id)).expect("mmd");
        assert!(script.starts_with("flowchart "));
    }
    assert!(config.flowchart_stats_path().exists());
    assert!(config.conversation_stats_path().exists());

    // Training records: id, image, conversations only.
    let training: Value =
        serde_json::from_str(&fs::read_to_string(config.conversations_path()).expect("file"))
            .expect("json");
    let records = training.as_array().expect("array");
    assert_eq!(records.len(), sample_stats.all_num());
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record["id"].as_u64(), Some(index as u64));
        assert!(record.get("type").is_none());
        assert!(record["conversations"].as_array().expect("conv").len() == 2);
        assert!(record["image"].as_str().expect("image").starts_with("img/"));
    }

    // Evaluation records add the type code and ground truth.
    let evaluation: Value =
        serde_json::from_str(&fs::read_to_string(config.conversations_qa_path()).expect("file"))
            .expect("json");
    for record in evaluation.as_array().expect("array") {
        let code = record["type"].as_u64().expect("type");
        assert!((1..=5).contains(&code));
        assert!(record["ground_truth"].as_array().is_some());
        let sequence_len = record["sequence_len"].as_u64().expect("sequence_len");
        if code == 5 {
            assert!(sequence_len >= 3);
        } else {
            assert_eq!(sequence_len, 0);
        }
    }

    // Question lines have the image placeholder stripped.
    let questions = fs::read_to_string(config.questions_path()).expect("questions");
    let question_lines: Vec<Value> = questions
        .lines()
        .map(|l| serde_json::from_str(l).expect("jsonl"))
        .collect();
    assert_eq!(question_lines.len(), sample_stats.all_num());
    for line in &question_lines {
        assert!(!line["text"].as_str().expect("text").contains("<image>"));
    }

    let ground_truths = fs::read_to_string(config.ground_truths_path()).expect("ground truths");
    assert_eq!(ground_truths.lines().count(), sample_stats.all_num());
}

#[test]
fn test_pipeline_is_deterministic_for_a_seed() {
    let dir_a = tempfile::tempdir().expect("tempdir");
    let dir_b = tempfile::tempdir().expect("tempdir");

    for dir in [&dir_a, &dir_b] {
        let config = scratch_config(dir.path(), 7);
        let mut rng = StdRng::seed_from_u64(config.seed);
        dataset::run_pipeline(&config, None, &mut rng).expect("pipeline");
    }

    let read = |dir: &tempfile::TempDir| {
        fs::read_to_string(scratch_config(dir.path(), 7).conversations_path()).expect("file")
    };
    assert_eq!(read(&dir_a), read(&dir_b));
}

#[test]
fn test_missing_artifacts_skip_the_chart_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = scratch_config(dir.path(), 13);
    let mut rng = StdRng::seed_from_u64(config.seed);

    dataset::generate_flowcharts(&config, &mut rng).expect("charts");
    fs::remove_file(config.chart_path(2)).expect("remove");
    assert!(!dataset::check_integrity(&config, 2));

    assert!(matches!(
        SampleBuilder::from_artifacts(&config, 2, 0, None),
        Err(DatasetError::MissingArtifacts { chart_id: 2 })
    ));

    // The batch continues without the broken chart.
    let stats = dataset::generate_samples(&config, None, &mut rng).expect("samples");
    assert!(stats.all_num() > 0);

    let training: Value =
        serde_json::from_str(&fs::read_to_string(config.conversations_path()).expect("file"))
            .expect("json");
    assert_eq!(training.as_array().expect("array").len(), stats.all_num());
}

#[test]
fn test_invalid_configuration_is_rejected_before_generation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = scratch_config(dir.path(), 1);
    config.max_node_num = 2;

    assert!(matches!(config.validate(), Err(ConfigError::NodeLimitOutOfRange { .. })));

    let mut rng = StdRng::seed_from_u64(1);
    assert!(dataset::run_pipeline(&config, None, &mut rng).is_err());
    // Nothing was written.
    assert!(!config.run_dir().exists());
}
