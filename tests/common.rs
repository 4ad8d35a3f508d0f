//! Common test fixtures: hand-built flowcharts with known structure.
use nagarezu::prelude::*;

/// A minimal decision chart whose matrix is exactly
/// `[[0, 1, 0], [0, 0, 10], [0, 0, 0]]`: one plain edge `0 -> 1` and one
/// `Y`-labeled edge `1 -> 2`.
#[allow(dead_code)]
pub fn minimal_decision_chart() -> Flowchart {
    Flowchart::new(
        ChartKind::Decision,
        3,
        vec![
            ("start".to_string(), NodeKind::Normal),
            ("gate".to_string(), NodeKind::Decision),
            ("done".to_string(), NodeKind::Normal),
        ],
        vec![Edge::plain(0, 1), Edge::labeled(1, 2, EdgeLabel::Yes)],
    )
}

/// A four-node decision chart with a complete `Y`/`N` branch:
///
/// ```text
/// intake -> inspect -Y-> accept -> reject
///              \----N----------->/
/// ```
#[allow(dead_code)]
pub fn decision_chart() -> Flowchart {
    Flowchart::new(
        ChartKind::Decision,
        4,
        vec![
            ("intake".to_string(), NodeKind::Normal),
            ("inspect".to_string(), NodeKind::Decision),
            ("accept".to_string(), NodeKind::Normal),
            ("reject".to_string(), NodeKind::Normal),
        ],
        vec![
            Edge::plain(0, 1),
            Edge::labeled(1, 2, EdgeLabel::Yes),
            Edge::labeled(1, 3, EdgeLabel::No),
            Edge::plain(2, 3),
        ],
    )
}

/// A four-node normal chart: a chain with one skip edge.
#[allow(dead_code)]
pub fn normal_chart() -> Flowchart {
    Flowchart::new(
        ChartKind::Normal,
        4,
        vec![
            ("fetch".to_string(), NodeKind::Normal),
            ("parse".to_string(), NodeKind::Normal),
            ("store".to_string(), NodeKind::Normal),
            ("report".to_string(), NodeKind::Normal),
        ],
        vec![
            Edge::plain(0, 1),
            Edge::plain(0, 2),
            Edge::plain(1, 2),
            Edge::plain(2, 3),
        ],
    )
}
