//! Question text for the five query classes.

/// Placeholder token marking where the rendered diagram goes in a
/// conversation.
pub const IMG_PLACEHOLDER: &str = "<image>\n";

/// The five question classes; [`QuestionType::code`] gives the wire code
/// used in evaluation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    NextOk,
    AllNext,
    AllPrev,
    Cond,
    Valid,
}

impl QuestionType {
    /// The numeric code used in evaluation records.
    pub fn code(self) -> u8 {
        match self {
            QuestionType::NextOk => 1,
            QuestionType::AllNext => 2,
            QuestionType::AllPrev => 3,
            QuestionType::Cond => 4,
            QuestionType::Valid => 5,
        }
    }
}

/// One question over a flowchart, as posed to the model.
///
/// A closed set: the five variants cover every question class this dataset
/// contains, each carrying its own question text and chain-of-thought
/// prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    NextOk {
        cur_state: String,
        next_state: String,
    },
    AllNext {
        cur_state: String,
    },
    AllPrev {
        cur_state: String,
    },
    Cond {
        cur_state: String,
        value: String,
    },
    Valid {
        sequence: String,
    },
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Question::NextOk { .. } => QuestionType::NextOk,
            Question::AllNext { .. } => QuestionType::AllNext,
            Question::AllPrev { .. } => QuestionType::AllPrev,
            Question::Cond { .. } => QuestionType::Cond,
            Question::Valid { .. } => QuestionType::Valid,
        }
    }

    /// The bare question, prefixed with the image placeholder.
    pub fn basic_text(&self) -> String {
        match self {
            Question::NextOk {
                cur_state,
                next_state,
            } => format!(
                "{IMG_PLACEHOLDER}Given that the current state is {cur_state}, \
                 is it possible to take state {next_state} as the next step?"
            ),
            Question::AllNext { cur_state } => format!(
                "{IMG_PLACEHOLDER}Given that the current state is {cur_state}, \
                 what are the possible next states?"
            ),
            Question::AllPrev { cur_state } => format!(
                "{IMG_PLACEHOLDER}Given that the current state is {cur_state}, \
                 what states might be the previous states?"
            ),
            Question::Cond { cur_state, value } => format!(
                "{IMG_PLACEHOLDER}Given that the current state is {cur_state}, \
                 what might be the next states when the condition is {value}?"
            ),
            Question::Valid { sequence } => {
                format!("{IMG_PLACEHOLDER}Is the sequence {sequence} a valid state sequence?")
            }
        }
    }

    /// The chain-of-thought suffix describing how to derive the answer.
    pub fn cot_prompt(&self) -> String {
        match self {
            Question::NextOk {
                cur_state,
                next_state,
            } => format!(
                "Please first find all the possible next states from {cur_state}, \
                 then check if {next_state} is among them, and finally give your answer."
            ),
            Question::AllNext { cur_state } => format!(
                "Please first list all outgoing edges from {cur_state}, explain each, \
                 and then summarize the possible next states."
            ),
            Question::AllPrev { cur_state } => format!(
                "Please first find all incoming edges to {cur_state}, explain the origin \
                 of each, and then list the possible previous states."
            ),
            Question::Cond { cur_state, value } => format!(
                "Please first list all conditional branches from {cur_state}, identify \
                 the branch where the condition is {value}, and then specify the possible \
                 next states accordingly."
            ),
            Question::Valid { sequence } => format!(
                "Please first check the transition between each pair of consecutive states \
                 in {sequence}, verify if each transition is valid, and then give your \
                 final answer."
            ),
        }
    }

    /// Assembles the complete question text, optionally appending the
    /// chain-of-thought prompt and a recognized-text context block.
    pub fn build(&self, use_cot: bool, ocr_content: Option<&str>) -> String {
        let mut question = self.basic_text();
        if use_cot {
            question.push(' ');
            question.push_str(&self.cot_prompt());
        }
        if let Some(content) = ocr_content {
            question.push(' ');
            question.push_str(content);
        }
        question
    }
}
