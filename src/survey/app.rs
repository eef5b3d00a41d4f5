/*!
The application state machine.

The front-end translates user input into `FormEvent`s and hands them to `App::handle`, one
at a time. Each event is handled to completion before the next one. While a dialog is open,
only the dialog events have an effect.
*/

use std::path::{Path, PathBuf};

use likert_form::{attempt_submit, FormState, Outcome};
use log::{debug, error, info, warn};

use crate::survey::io_csv::append_record;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TextEdit {
    Insert(char),
    Backspace,
}

/// Everything the user can do with the form.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FormEvent {
    SelectionChanged { question: usize, answer: usize },
    TextEdited(TextEdit),
    SubmitClicked,
    CloseRequested,
    /// OK in a dialog
    DialogAccepted,
    /// Cancel in a dialog
    DialogDismissed,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Mode {
    Editing,
    /// "Submission incomplete"
    Warning,
    ConfirmQuit,
    /// The record could not be written. The form is kept for another attempt.
    StorageFailed(String),
    /// The record is written, waiting for the user to acknowledge.
    Saved,
    Finished(Exit),
}

/// How the form was closed.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Exit {
    Submitted,
    Discarded,
}

pub struct App {
    form: FormState,
    output_file: PathBuf,
    mode: Mode,
}

impl App {
    pub fn new(form: FormState, output_file: PathBuf) -> App {
        App {
            form,
            output_file,
            mode: Mode::Editing,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn exit(&self) -> Option<Exit> {
        match self.mode {
            Mode::Finished(exit) => Some(exit),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: FormEvent) {
        debug!("handle: mode: {:?} event: {:?}", self.mode, event);
        let next = match (&self.mode, event) {
            (Mode::Editing, FormEvent::SelectionChanged { question, answer }) => {
                if let Err(e) = self.form.select(question, answer) {
                    warn!("handle: ignoring selection: {}", e);
                }
                None
            }
            (Mode::Editing, FormEvent::TextEdited(TextEdit::Insert(c))) => {
                self.form.push_char(c);
                None
            }
            (Mode::Editing, FormEvent::TextEdited(TextEdit::Backspace)) => {
                self.form.pop_char();
                None
            }
            (Mode::Editing, FormEvent::SubmitClicked) => {
                Some(submit(&self.form, &self.output_file))
            }
            (Mode::Editing, FormEvent::CloseRequested) => Some(Mode::ConfirmQuit),

            (Mode::Warning, FormEvent::DialogAccepted | FormEvent::DialogDismissed) => {
                Some(Mode::Editing)
            }
            (Mode::StorageFailed(_), FormEvent::DialogAccepted | FormEvent::DialogDismissed) => {
                Some(Mode::Editing)
            }
            (Mode::ConfirmQuit, FormEvent::DialogAccepted) => {
                info!("handle: response discarded");
                Some(Mode::Finished(Exit::Discarded))
            }
            (Mode::ConfirmQuit, FormEvent::DialogDismissed) => Some(Mode::Editing),
            (Mode::Saved, FormEvent::DialogAccepted | FormEvent::DialogDismissed) => {
                Some(Mode::Finished(Exit::Submitted))
            }
            (mode, event) => {
                debug!("handle: {:?} has no effect in mode {:?}", event, mode);
                None
            }
        };
        if let Some(mode) = next {
            self.mode = mode;
        }
    }
}

fn submit(form: &FormState, output_file: &Path) -> Mode {
    match attempt_submit(form) {
        Outcome::Incomplete => {
            info!("submit: submission incomplete");
            Mode::Warning
        }
        Outcome::Ready(record) => match append_record(&record, output_file) {
            Ok(()) => Mode::Saved,
            Err(e) => {
                error!("submit: could not save the response: {}", e);
                Mode::StorageFailed(e.to_string())
            }
        },
    }
}
