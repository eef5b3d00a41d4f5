use log::info;

use snafu::prelude::*;

use std::path::PathBuf;

use likert_form::{FormErrors, FormState};

use crate::args::Args;

pub mod app;
pub mod config_reader;
pub mod io_csv;
pub mod tui;

use crate::survey::app::{App, Exit};
use crate::survey::config_reader::*;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid questions in configuration: {source}"))]
    InvalidForm { source: FormErrors },

    #[snafu(display("Error opening file {path}"))]
    OpeningCsv {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing a row to {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error flushing {path}"))]
    FlushingCsv {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("Terminal error"))]
    Terminal { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The settings of the form once the configuration file and the flags are combined.
fn resolve_settings(args: &Args) -> SurveyResult<FormSettings> {
    let mut settings = match args.config.clone() {
        Some(path) => read_config(path)?,
        None => FormSettings::default(),
    };
    // The command line takes precedence over the configuration file.
    if let Some(out) = args.out.clone() {
        if out.is_empty() {
            whatever!("The --out option must not be empty");
        }
        settings.output_file = PathBuf::from(out);
    }
    Ok(settings)
}

/// Shows the form until the response is recorded or the user quits.
pub fn run_survey(args: &Args) -> SurveyResult<Exit> {
    let settings = resolve_settings(args)?;
    info!(
        "run_survey: {} questions, output file {:?}",
        settings.registry.len(),
        settings.output_file
    );

    let mut app = App::new(FormState::new(&settings.registry), settings.output_file.clone());
    let exit = tui::run_form(&mut app, &settings.title, &settings.prompt)?;

    match exit {
        Exit::Submitted => info!("Response recorded in {:?}", settings.output_file),
        Exit::Discarded => info!("Response discarded"),
    }
    Ok(exit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let settings = resolve_settings(&Args::default()).unwrap();
        assert_eq!(settings.output_file, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(settings.registry.len(), 5);
    }

    #[test]
    fn out_flag_overrides() {
        let args = Args {
            out: Some("responses.csv".to_string()),
            ..Args::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.output_file, PathBuf::from("responses.csv"));

        let args = Args {
            out: Some("".to_string()),
            ..Args::default()
        };
        assert!(matches!(
            resolve_settings(&args),
            Err(SurveyError::Whatever { .. })
        ));
    }

    #[test]
    fn missing_config_file() {
        let args = Args {
            config: Some("/nonexistent/survey.json".to_string()),
            ..Args::default()
        };
        assert!(matches!(
            resolve_settings(&args),
            Err(SurveyError::OpeningJson { .. })
        ));
    }
}
