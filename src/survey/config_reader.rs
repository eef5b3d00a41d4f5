use crate::survey::*;
use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use likert_form::builder::Builder;
use likert_form::Registry;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Work Time Management";

pub const DEFAULT_PROMPT: &str = "Please provide a brief explanation for your answers including any thoughts or observations you would like to share.";

pub const DEFAULT_OUTPUT_FILE: &str = "data.csv";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct QuestionConfig {
    pub label: String,
    pub answers: Vec<String>,
}

/// The JSON description of a form. All the keys are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub title: Option<String>,
    pub prompt: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    pub questions: Option<Vec<QuestionConfig>>,
}

/// What the form needs to run.
#[derive(Debug, Clone)]
pub struct FormSettings {
    pub title: String,
    pub prompt: String,
    pub output_file: PathBuf,
    pub registry: Registry,
}

impl Default for FormSettings {
    fn default() -> Self {
        FormSettings {
            title: DEFAULT_TITLE.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            registry: Registry::default_questions(),
        }
    }
}

pub fn read_config(path: String) -> SurveyResult<FormSettings> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path: &path })?;
    debug!("read_config: {:?}", contents);
    let config: SurveyConfig =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path: &path })?;
    // Relative output files are relative to the configuration file.
    let root_p = Path::new(path.as_str())
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    build_settings(&config, &root_p)
}

pub fn build_settings(config: &SurveyConfig, root_p: &Path) -> SurveyResult<FormSettings> {
    let defaults = FormSettings::default();
    let registry = match &config.questions {
        Some(questions) => {
            let mut builder = Builder::new();
            for q in questions {
                builder = builder
                    .question(&q.label, &q.answers)
                    .context(InvalidFormSnafu {})?;
            }
            builder.build().context(InvalidFormSnafu {})?
        }
        None => defaults.registry,
    };
    let output_file = match &config.output_file {
        Some(s) if s.is_empty() => whatever!("outputFile must not be empty"),
        Some(s) => root_p.join(s),
        None => defaults.output_file,
    };
    Ok(FormSettings {
        title: config.title.clone().unwrap_or(defaults.title),
        prompt: config.prompt.clone().unwrap_or(defaults.prompt),
        output_file,
        registry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> SurveyConfig {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let settings = build_settings(&parse("{}"), Path::new("/etc/survey")).unwrap();
        assert_eq!(settings.title, DEFAULT_TITLE);
        assert_eq!(settings.prompt, DEFAULT_PROMPT);
        assert_eq!(settings.output_file, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(settings.registry, Registry::default_questions());
    }

    #[test]
    fn custom_questions_and_output() {
        let config = parse(
            r#"{
                "title": "Standup",
                "outputFile": "standup.csv",
                "questions": [
                    {"label": "Mood", "answers": ["GOOD", "BAD"]},
                    {"label": "Blocked", "answers": ["YES", "NO"]}
                ]
            }"#,
        );
        let settings = build_settings(&config, Path::new("/tmp/forms")).unwrap();
        assert_eq!(settings.title, "Standup");
        assert_eq!(settings.prompt, DEFAULT_PROMPT);
        assert_eq!(settings.output_file, PathBuf::from("/tmp/forms/standup.csv"));
        assert_eq!(settings.registry.len(), 2);
        assert_eq!(settings.registry.questions()[1].label, "Blocked");
    }

    #[test]
    fn invalid_questions() {
        let config = parse(r#"{"questions": []}"#);
        assert!(matches!(
            build_settings(&config, Path::new("")),
            Err(SurveyError::InvalidForm {
                source: FormErrors::EmptyRegistry
            })
        ));
        let config = parse(r#"{"questions": [{"label": "Mood", "answers": []}]}"#);
        assert!(matches!(
            build_settings(&config, Path::new("")),
            Err(SurveyError::InvalidForm { .. })
        ));
    }

    #[test]
    fn too_many_questions() {
        let questions: Vec<QuestionConfig> = (0..44_000)
            .map(|i| QuestionConfig {
                label: format!("Q{}", i),
                answers: vec!["x".to_string()],
            })
            .collect();
        let config = SurveyConfig {
            questions: Some(questions),
            ..SurveyConfig::default()
        };
        assert!(matches!(
            build_settings(&config, Path::new("")),
            Err(SurveyError::InvalidForm {
                source: FormErrors::TooManyQuestions(likert_form::MAX_QUESTIONS)
            })
        ));
    }

    #[test]
    fn empty_output_file() {
        let config = parse(r#"{"outputFile": ""}"#);
        assert!(build_settings(&config, Path::new("")).is_err());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.json");
        fs::write(&path, r#"{"outputFile": "out.csv"}"#).unwrap();
        let settings = read_config(path.display().to_string()).unwrap();
        assert_eq!(settings.output_file, dir.path().join("out.csv"));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            read_config(path.display().to_string()),
            Err(SurveyError::ParsingJson { .. })
        ));
    }
}
