pub mod builder;
mod config;
pub mod layout;

use chrono::{Local, NaiveDateTime};
use log::{debug, info};

pub use crate::config::*;

/// The mutable state of a form: one optional answer per question and the free text.
///
/// A selection is stored as an index into the allowed answers of its question, so
/// a value outside of the scale cannot be stored.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FormState {
    registry: Registry,
    selections: Vec<Option<usize>>,
    text: String,
}

impl FormState {
    /// A fresh form: every question unanswered, empty text.
    pub fn new(registry: &Registry) -> FormState {
        FormState {
            registry: registry.clone(),
            selections: vec![None; registry.len()],
            text: String::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn select(&mut self, question: usize, answer: usize) -> Result<(), FormErrors> {
        let q = self
            .registry
            .questions
            .get(question)
            .ok_or(FormErrors::UnknownQuestion(question))?;
        if answer >= q.allowed_answers.len() {
            return Err(FormErrors::UnknownAnswer(question, answer));
        }
        debug!("select: {:?} -> {:?}", q.label, q.allowed_answers[answer]);
        self.selections[question] = Some(answer);
        Ok(())
    }

    /// Selects an answer by its value.
    pub fn select_value(&mut self, question: usize, value: &str) -> Result<(), FormErrors> {
        let q = self
            .registry
            .questions
            .get(question)
            .ok_or(FormErrors::UnknownQuestion(question))?;
        let answer = q
            .allowed_answers
            .iter()
            .position(|a| a == value)
            .ok_or_else(|| FormErrors::UnknownValue(question, value.to_string()))?;
        self.select(question, answer)
    }

    pub fn selection(&self, question: usize) -> Option<usize> {
        self.selections.get(question).cloned().flatten()
    }

    /// The chosen value of a question, if any.
    pub fn selected_value(&self, question: usize) -> Option<&str> {
        let answer = self.selection(question)?;
        self.registry.questions[question]
            .allowed_answers
            .get(answer)
            .map(|s| s.as_str())
    }

    /// The value to display for a question. Missing answers read as "Unanswered".
    pub fn display_value(&self, question: usize) -> &str {
        self.selected_value(question).unwrap_or(UNANSWERED)
    }

    /// The answer after the current one, wrapping around. An unanswered question goes to
    /// the first answer.
    pub fn next_answer(&self, question: usize) -> Option<usize> {
        let n = self.registry.questions.get(question)?.allowed_answers.len();
        match self.selection(question) {
            None => Some(0),
            Some(i) => Some((i + 1) % n),
        }
    }

    /// The answer before the current one, wrapping around. An unanswered question goes
    /// to the last answer.
    pub fn previous_answer(&self, question: usize) -> Option<usize> {
        let n = self.registry.questions.get(question)?.allowed_answers.len();
        match self.selection(question) {
            None => Some(n - 1),
            Some(i) => Some((i + n - 1) % n),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn pop_char(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// The labels of the questions that still need an answer.
    pub fn unanswered(&self) -> Vec<&str> {
        self.registry
            .questions
            .iter()
            .zip(self.selections.iter())
            .filter(|(_, s)| s.is_none())
            .map(|(q, _)| q.label.as_str())
            .collect()
    }

    /// True when all the questions are answered and the free text is not empty.
    ///
    /// This check does not modify the form.
    pub fn is_complete(&self) -> bool {
        self.selections.iter().all(|s| s.is_some()) && !self.text.is_empty()
    }
}

/// Validates the form and builds the record to persist, captured at the current local time.
pub fn attempt_submit(form: &FormState) -> Outcome {
    attempt_submit_at(form, Local::now().naive_local())
}

/// Validates the form and builds the record to persist.
///
/// All the questions must be answered and the text must contain at least one character,
/// otherwise the outcome is `Incomplete` and no record is built.
pub fn attempt_submit_at(form: &FormState, captured_at: NaiveDateTime) -> Outcome {
    if !form.is_complete() {
        debug!(
            "attempt_submit: incomplete: unanswered: {:?} text length: {}",
            form.unanswered(),
            form.text.chars().count()
        );
        return Outcome::Incomplete;
    }
    let mut answers: Vec<(String, String)> = Vec::new();
    for (idx, q) in form.registry.questions.iter().enumerate() {
        // Guaranteed by is_complete()
        if let Some(value) = form.selected_value(idx) {
            answers.push((q.label.clone(), value.to_string()));
        }
    }
    info!("attempt_submit: answers: {:?}", answers);
    Outcome::Ready(SubmissionRecord::new(answers, form.text.clone(), captured_at))
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;
    use chrono::NaiveDate;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(14, 5, 9, 123456)
            .unwrap()
    }

    fn two_questions() -> Registry {
        Builder::new()
            .question(
                "Satisfaction",
                &SATISFACTION_SCALE.map(|s| s.to_string()),
            )
            .unwrap()
            .question("Energy", &ENERGY_SCALE.map(|s| s.to_string()))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn new_form_is_blank() {
        let form = FormState::new(&Registry::default_questions());
        assert_eq!(form.registry().len(), 5);
        for idx in 0..5 {
            assert_eq!(form.selection(idx), None);
            assert_eq!(form.display_value(idx), UNANSWERED);
        }
        assert_eq!(form.text(), "");
        assert!(!form.is_complete());
    }

    #[test]
    fn emits_values_then_text_then_timestamp() {
        init();
        let mut form = FormState::new(&two_questions());
        form.select_value(0, "SATISFIED").unwrap();
        form.select_value(1, "HIGH").unwrap();
        form.set_text("ok");
        let record = match attempt_submit_at(&form, ts()) {
            Outcome::Ready(r) => r,
            Outcome::Incomplete => panic!("form should be complete"),
        };
        assert_eq!(
            record.answers(),
            &[
                ("Satisfaction".to_string(), "SATISFIED".to_string()),
                ("Energy".to_string(), "HIGH".to_string())
            ]
        );
        assert_eq!(
            record.fields(),
            vec!["SATISFIED", "HIGH", "ok", "2024-03-01 14:05:09.123456"]
        );
    }

    #[test]
    fn missing_answer_is_incomplete() {
        let mut form = FormState::new(&two_questions());
        form.select_value(0, "SATISFIED").unwrap();
        form.set_text("ok");
        let before = form.clone();
        assert_eq!(attempt_submit_at(&form, ts()), Outcome::Incomplete);
        assert_eq!(form, before);
        assert_eq!(form.unanswered(), vec!["Energy"]);
    }

    #[test]
    fn empty_text_is_incomplete() {
        let mut form = FormState::new(&two_questions());
        form.select(0, 1).unwrap();
        form.select(1, 3).unwrap();
        assert_eq!(attempt_submit_at(&form, ts()), Outcome::Incomplete);
        form.push_char(' ');
        assert!(matches!(attempt_submit_at(&form, ts()), Outcome::Ready(_)));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut form = FormState::new(&two_questions());
        form.select(0, 0).unwrap();
        assert_eq!(attempt_submit_at(&form, ts()), attempt_submit_at(&form, ts()));
        form.select(1, 0).unwrap();
        form.set_text("done");
        assert_eq!(attempt_submit_at(&form, ts()), attempt_submit_at(&form, ts()));
    }

    #[test]
    fn succeeds_iff_all_answered_and_text() {
        // Every selection pattern over 3 questions, with and without text.
        let registry = Builder::new()
            .question("A", &["a1".to_string(), "a2".to_string()])
            .unwrap()
            .question("B", &["b1".to_string()])
            .unwrap()
            .question("C", &["c1".to_string(), "c2".to_string()])
            .unwrap()
            .build()
            .unwrap();
        for mask in 0..8u32 {
            for text in ["", "x"] {
                let mut form = FormState::new(&registry);
                for q in 0..3 {
                    if mask & (1 << q) != 0 {
                        form.select(q, 0).unwrap();
                    }
                }
                form.set_text(text);
                let expected = mask == 7 && !text.is_empty();
                match attempt_submit_at(&form, ts()) {
                    Outcome::Ready(r) => {
                        assert!(expected, "mask {} text {:?}", mask, text);
                        assert_eq!(r.fields().len(), registry.len() + 2);
                    }
                    Outcome::Incomplete => assert!(!expected, "mask {} text {:?}", mask, text),
                }
            }
        }
    }

    #[test]
    fn rejects_values_outside_scale() {
        let mut form = FormState::new(&two_questions());
        assert_eq!(form.select(0, 5), Err(FormErrors::UnknownAnswer(0, 5)));
        assert_eq!(form.select(2, 0), Err(FormErrors::UnknownQuestion(2)));
        assert!(form.select_value(1, "SATISFIED").is_err());
        assert_eq!(form.selection(0), None);
        assert_eq!(form.selection(1), None);
    }

    #[test]
    fn cycles_through_answers() {
        let mut form = FormState::new(&Registry::default_questions());
        // Session Type has two answers
        assert_eq!(form.next_answer(3), Some(0));
        assert_eq!(form.previous_answer(3), Some(1));
        form.select(3, 1).unwrap();
        assert_eq!(form.next_answer(3), Some(0));
        assert_eq!(form.previous_answer(3), Some(0));
        assert_eq!(form.next_answer(9), None);
    }

    #[test]
    fn text_editing() {
        let mut form = FormState::new(&Registry::default_questions());
        form.push_char('h');
        form.push_char('é');
        assert_eq!(form.text(), "hé");
        assert_eq!(form.pop_char(), Some('é'));
        assert_eq!(form.pop_char(), Some('h'));
        assert_eq!(form.pop_char(), None);
    }

    #[test]
    fn default_registry_order() {
        let labels: Vec<String> = Registry::default_questions()
            .questions()
            .iter()
            .map(|q| q.label.clone())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Satisfaction",
                "Energy Levels",
                "Focus",
                "Session Type",
                "Task Completion"
            ]
        );
    }
}
