use clap::Parser;

/// This is a statistics program for field survey submissions.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the analysis (data sources, selection, rules) in JSON.
    /// For more information about the file format, read the documentation of the manual module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected summary in JSON format. If provided, surveystat will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the submissions. Setting this option overrides the
    /// data sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default json) The type of the input: json, csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The key of the survey module to analyze (for example Survey1).
    #[clap(short, long, value_parser)]
    pub survey: Option<String>,

    /// The id of the question to analyze.
    #[clap(short, long, value_parser)]
    pub question: Option<String>,

    /// (default all) Restricts the respondents to one ward.
    #[clap(short, long, value_parser)]
    pub ward: Option<String>,

    /// (default 7) The number of answers that get their own bucket.
    #[clap(long, value_parser)]
    pub top_answers: Option<usize>,

    /// (default 30) The number of characters after which an answer label is shortened.
    #[clap(long, value_parser)]
    pub max_label_length: Option<usize>,

    /// (bar, pie, table or empty) If specified, a chart series is added to the summary.
    #[clap(long, value_parser)]
    pub chart: Option<String>,

    /// (default question) The report to produce: question, catalog, wards, overview or users.
    #[clap(long, value_parser)]
    pub report: Option<String>,

    /// (file path) The list of registered users, in JSON.
    #[clap(long, value_parser)]
    pub users: Option<String>,

    /// (file path) The logged-in user, in JSON. Required by the overview and users reports.
    #[clap(long, value_parser)]
    pub session: Option<String>,

    /// Filters the users report on the user name or the email.
    #[clap(long, value_parser)]
    pub search: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
