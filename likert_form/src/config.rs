// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use chrono::NaiveDateTime;

/// The label displayed for a question that has not received an answer yet.
///
/// It is only used for display. The form state itself stores missing answers as `None`.
pub const UNANSWERED: &str = "Unanswered";

/// Format of the capture timestamp, in local time with microsecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub const SATISFACTION_SCALE: [&str; 5] = [
    "VERY SATISFIED",
    "SATISFIED",
    "NEITHER SATISFIED NOR DISSATISFIED",
    "DISSATISFIED",
    "VERY DISSATISFIED",
];

pub const ENERGY_SCALE: [&str; 5] = ["VERY LOW", "LOW", "MODERATE", "HIGH", "VERY HIGH"];

pub const SESSION_TASK_SPLIT: [&str; 2] = ["Single Task", "Multi-Task"];

pub const TASK_COMPLETION: [&str; 2] = ["Main Task Completed", "Multi-Task Contribution"];

/// Largest number of questions a registry accepts. Every question takes a row of a
/// terminal screen, so the grid has to stay far below the `u16` range of the renderer.
pub const MAX_QUESTIONS: usize = 256;

/// A question of the survey, with its ordered list of allowed answers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Question {
    pub label: String,
    pub allowed_answers: Vec<String>,
}

impl Question {
    pub fn new(label: &str, allowed_answers: &[&str]) -> Question {
        Question {
            label: label.to_string(),
            allowed_answers: allowed_answers.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The ordered list of questions asked by a form.
///
/// Invariant: there is at least one question, labels are unique and every
/// question has at least one answer. Use the builder to construct custom registries.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Registry {
    pub(crate) questions: Vec<Question>,
}

impl Registry {
    /// The five questions of the work session survey.
    pub fn default_questions() -> Registry {
        Registry {
            questions: vec![
                Question::new("Satisfaction", &SATISFACTION_SCALE),
                Question::new("Energy Levels", &ENERGY_SCALE),
                Question::new("Focus", &ENERGY_SCALE),
                Question::new("Session Type", &SESSION_TASK_SPLIT),
                Question::new("Task Completion", &TASK_COMPLETION),
            ],
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::default_questions()
    }
}

// ******** Output data structures *********

/// A completed form, ready to be persisted.
///
/// It is only built by the submission pipeline, when all the questions have an answer
/// and the free text is not empty.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SubmissionRecord {
    /// (question label, chosen value), in registry order
    answers: Vec<(String, String)>,
    text: String,
    captured_at: NaiveDateTime,
}

impl SubmissionRecord {
    pub(crate) fn new(
        answers: Vec<(String, String)>,
        text: String,
        captured_at: NaiveDateTime,
    ) -> SubmissionRecord {
        SubmissionRecord {
            answers,
            text,
            captured_at,
        }
    }

    pub fn answers(&self) -> &[(String, String)] {
        &self.answers
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn captured_at(&self) -> NaiveDateTime {
        self.captured_at
    }

    /// The fields of the persisted row: the chosen values (without labels), the free
    /// text and the timestamp.
    pub fn fields(&self) -> Vec<String> {
        let mut res: Vec<String> = self.answers.iter().map(|(_, v)| v.clone()).collect();
        res.push(self.text.clone());
        res.push(self.captured_at.format(TIMESTAMP_FORMAT).to_string());
        res
    }
}

/// The result of a submission attempt.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Outcome {
    /// At least one question is unanswered or the text is empty.
    Incomplete,
    Ready(SubmissionRecord),
}

/// Errors when building a registry or updating a form.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FormErrors {
    EmptyRegistry,
    TooManyQuestions(usize),
    EmptyScale(String),
    DuplicateQuestion(String),
    DuplicateAnswer(String, String),
    UnknownQuestion(usize),
    UnknownAnswer(usize, usize),
    UnknownValue(usize, String),
}

impl Error for FormErrors {}

impl Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormErrors::EmptyRegistry => write!(f, "the form has no question"),
            FormErrors::TooManyQuestions(max) => {
                write!(f, "the form has more than {} questions", max)
            }
            FormErrors::EmptyScale(label) => {
                write!(f, "question {:?} has an empty label or no answer", label)
            }
            FormErrors::DuplicateQuestion(label) => {
                write!(f, "question {:?} is defined more than once", label)
            }
            FormErrors::DuplicateAnswer(label, answer) => {
                write!(f, "question {:?} lists answer {:?} twice", label, answer)
            }
            FormErrors::UnknownQuestion(idx) => write!(f, "no question at index {}", idx),
            FormErrors::UnknownAnswer(q_idx, a_idx) => {
                write!(f, "question {} has no answer at index {}", q_idx, a_idx)
            }
            FormErrors::UnknownValue(q_idx, value) => {
                write!(f, "question {} does not accept {:?}", q_idx, value)
            }
        }
    }
}
