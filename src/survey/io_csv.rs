// Primitives for appending responses to CSV files.

use std::fs::OpenOptions;
use std::path::Path;

use likert_form::SubmissionRecord;
use log::info;

use crate::survey::*;
use snafu::prelude::*;

/// Appends one row to the file, creating it if it does not exist.
///
/// The row contains the fields of the record in order. No header is ever written. The
/// data is flushed before returning.
pub fn append_record(record: &SubmissionRecord, path: &Path) -> SurveyResult<()> {
    let path_s = path.display().to_string();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(OpeningCsvSnafu { path: &path_s })?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    let fields = record.fields();
    wtr.write_record(&fields)
        .context(WritingCsvSnafu { path: &path_s })?;
    wtr.flush().context(FlushingCsvSnafu { path: &path_s })?;
    info!("append_record: wrote {} fields to {:?}", fields.len(), path_s);
    Ok(())
}
