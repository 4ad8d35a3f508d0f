//! Deterministic step-by-step narrations for each query type.
//!
//! Every builder is a pure function of the query inputs and the solver's
//! outputs: the produced text is byte-for-byte reproducible, and no
//! randomness or matrix access happens here. Validity checks for the
//! sequence narration are computed upstream and passed in.

use itertools::Itertools;

/// Renders reasoning traces into the answer text of a conversation.
pub struct TraceBuilder;

impl TraceBuilder {
    /// Two steps: list the reachable next states, then check membership.
    pub fn nextok(
        cur_state: &str,
        next_state: &str,
        next_states: &[String],
        reachable: bool,
    ) -> String {
        let step1 = if next_states.is_empty() {
            format!(
                "Step 1: Find all possible next states from {cur_state}. \
                 There are no possible next states. "
            )
        } else {
            format!(
                "Step 1: Find all possible next states from {cur_state}. \
                 The possible next states are {}. ",
                next_states.iter().join(", ")
            )
        };
        let step2 = if reachable {
            format!(
                "Step 2: Check if {next_state} is among them. \
                 Since {next_state} is in the list, the answer is yes."
            )
        } else {
            format!(
                "Step 2: Check if {next_state} is among them. \
                 Since {next_state} is NOT in the list, the answer is no."
            )
        };
        [step1, step2].join("\n")
    }

    /// Three steps: list outgoing edges, explain each, summarize.
    pub fn allnext(cur_state: &str, next_states: &[String]) -> String {
        if next_states.is_empty() {
            let step1 = format!(
                "Step 1: Find all outgoing edges from {cur_state}. \
                 There are no outgoing edges. "
            );
            let step2 = "Step 2: No edges to explain. ".to_string();
            let step3 =
                format!("Step 3: Summarize. There are no possible next states from {cur_state}.");
            return [step1, step2, step3].join("\n");
        }

        let next_states_str = next_states.iter().join(", ");
        let step1 = format!(
            "Step 1: Find all outgoing edges from {cur_state}. \
             The outgoing edges point to {next_states_str}. "
        );
        let explanations = next_states
            .iter()
            .map(|state| format!("- {cur_state} can transition to {state}."))
            .join("\n");
        let step2 = format!("Step 2: Explain each outgoing edge:\n{explanations} ");
        let step3 = format!(
            "Step 3: Summarize. \
             The possible next states from {cur_state} are {next_states_str}."
        );
        [step1, step2, step3].join("\n")
    }

    /// Three steps: list incoming edges, explain each, summarize.
    pub fn allprev(cur_state: &str, prev_states: &[String]) -> String {
        if prev_states.is_empty() {
            let step1 = format!(
                "Step 1: Find all incoming edges to {cur_state}. \
                 There are no incoming edges. "
            );
            let step2 = "Step 2: No edges to explain. ".to_string();
            let step3 = format!(
                "Step 3: Summarize. There are no possible previous states leading to {cur_state}."
            );
            return [step1, step2, step3].join("\n");
        }

        let prev_states_str = prev_states.iter().join(", ");
        let step1 = format!(
            "Step 1: Find all incoming edges to {cur_state}. \
             The incoming edges come from {prev_states_str}. "
        );
        let explanations = prev_states
            .iter()
            .map(|state| format!("- There is an edge from {state} to {cur_state}."))
            .join("\n");
        let step2 = format!("Step 2: Explain each incoming edge:\n{explanations} ");
        let step3 = format!(
            "Step 3: Summarize. \
             The possible previous states leading to {cur_state} are {prev_states_str}."
        );
        [step1, step2, step3].join("\n")
    }

    /// Three steps: list conditional branches as `condition->target` pairs,
    /// filter by the queried value (case-insensitive), summarize.
    pub fn cond(cur_state: &str, value: &str, branches: &[(String, String)]) -> String {
        if branches.is_empty() {
            let step1 = format!(
                "Step 1: List all conditional branches from {cur_state}. \
                 There are no conditional branches. "
            );
            let step2 = format!(
                "Step 2: Identify branches where the condition is {value}. \
                 No branches exist. "
            );
            let step3 = format!("Step 3: Summarize. No possible next states from {cur_state}.");
            return [step1, step2, step3].join("\n");
        }

        let all_branches_str = branches
            .iter()
            .map(|(condition, state)| format!("{condition}->{state}"))
            .join(", ");
        let step1 = format!(
            "Step 1: List all conditional branches from {cur_state}. \
             The branches are: {all_branches_str}. "
        );

        let matched_states = branches
            .iter()
            .filter(|(condition, _)| condition.eq_ignore_ascii_case(value))
            .map(|(_, state)| state.as_str())
            .collect::<Vec<_>>();
        let (step2, step3) = if matched_states.is_empty() {
            (
                format!(
                    "Step 2: Identify branches where the condition is {value}. \
                     No branches match this condition. "
                ),
                format!(
                    "Step 3: Summarize. When the condition is {value}, \
                     there are no next states from {cur_state}."
                ),
            )
        } else {
            let matched_states_str = matched_states.iter().join(", ");
            (
                format!(
                    "Step 2: Identify branches where the condition is {value}. \
                     The matching branches lead to {matched_states_str}. "
                ),
                format!(
                    "Step 3: Summarize. When the condition is {value}, \
                     the possible next states from {cur_state} are {matched_states_str}."
                ),
            )
        };
        [step1, step2, step3].join("\n")
    }

    /// Three steps: list every consecutive transition, verify each against
    /// the precomputed checks, then give the final verdict.
    ///
    /// `transitions_ok` must hold one entry per consecutive pair, i.e.
    /// `sequence.len() - 1` entries.
    pub fn valid(sequence: &[String], transitions_ok: &[bool]) -> String {
        debug_assert_eq!(transitions_ok.len() + 1, sequence.len().max(1));

        let sequence_str = sequence.iter().join("->");
        let transitions = sequence
            .windows(2)
            .map(|pair| format!("{} -> {}", pair[0], pair[1]))
            .collect::<Vec<_>>();

        let step1 = format!(
            "Step 1: Check the transition between each pair of consecutive states in \
             {sequence_str}. The transitions are: {}.",
            transitions.iter().join(", ")
        );

        let mut step2 = "Step 2: Verify if each transition is valid.".to_string();
        let mut invalid_transitions = Vec::new();
        for (pair, &ok) in sequence.windows(2).zip(transitions_ok) {
            if ok {
                step2.push_str(&format!(
                    "\nThe transition from {} to {} is valid.",
                    pair[0], pair[1]
                ));
            } else {
                step2.push_str(&format!(
                    "\nThe transition from {} to {} is NOT valid.",
                    pair[0], pair[1]
                ));
                invalid_transitions.push(format!("{} -> {}", pair[0], pair[1]));
            }
        }

        let step3 = if invalid_transitions.is_empty() {
            format!(
                "Step 3: Final answer. \
                 Since all transitions are valid, the sequence {sequence_str} is valid."
            )
        } else {
            format!(
                "Step 3: Final answer. \
                 Since transitions {} are NOT valid, the sequence {sequence_str} is NOT valid.",
                invalid_transitions.iter().join(", ")
            )
        };

        [step1, step2, step3].join("\n")
    }
}
