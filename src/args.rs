use clap::Parser;

/// Records a work session survey (Likert-scale answers and a comment) to a CSV file.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the form: title, prompt, output file
    /// and questions. If not provided, the default work session questions are used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default data.csv) The CSV file the responses are appended to. Setting this
    /// option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) If specified, the log output is written to this file instead of
    /// the standard error.
    #[clap(long, value_parser)]
    pub log_file: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
