use std::collections::HashSet;

pub use crate::config::*;

/// A builder for custom registries of questions.
///
/// ```
/// pub use likert_form::builder::Builder;
/// # use likert_form::FormErrors;
///
/// let registry = Builder::new()
///     .question("Satisfaction", &["SATISFIED".to_string(), "DISSATISFIED".to_string()])?
///     .question("Energy", &["LOW".to_string(), "HIGH".to_string()])?
///     .build()?;
///
/// assert_eq!(registry.len(), 2);
/// # Ok::<(), FormErrors>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    pub(crate) _questions: Vec<Question>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _questions: Vec::new(),
        }
    }

    /// Adds a question at the end of the form.
    ///
    /// The answers are kept in the order given. They are the only values a selection
    /// can take for this question.
    pub fn question(mut self, label: &str, answers: &[String]) -> Result<Builder, FormErrors> {
        if label.trim().is_empty() || answers.is_empty() {
            return Err(FormErrors::EmptyScale(label.to_string()));
        }
        if self._questions.len() >= MAX_QUESTIONS {
            return Err(FormErrors::TooManyQuestions(MAX_QUESTIONS));
        }
        if self._questions.iter().any(|q| q.label == label) {
            return Err(FormErrors::DuplicateQuestion(label.to_string()));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for a in answers {
            if !seen.insert(a.as_str()) {
                return Err(FormErrors::DuplicateAnswer(label.to_string(), a.clone()));
            }
        }
        self._questions.push(Question {
            label: label.to_string(),
            allowed_answers: answers.to_vec(),
        });
        Ok(self)
    }

    pub fn build(self) -> Result<Registry, FormErrors> {
        if self._questions.is_empty() {
            return Err(FormErrors::EmptyRegistry);
        }
        Ok(Registry {
            questions: self._questions,
        })
    }
}
