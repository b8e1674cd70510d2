use clap::Parser;

/// This is a Likert-scale survey tabulation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The spreadsheet containing the survey responses, one row per
    /// participant. Excel (.xlsx) and CSV exports are supported.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default inferred from the file extension) The type of the input: 'xlsx' or 'csv'.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. When not
    /// specified, the file must contain a single worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default Partisipan) The name of the column holding the participant identifier.
    /// This column is excluded from the statistics.
    #[clap(long, value_parser)]
    pub participant_column: Option<String>,

    /// The statistic selector ('q1' to 'q13'). When not specified, one selector is read
    /// from the standard input.
    #[clap(short, long, value_parser)]
    pub selector: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of all the statistics will
    /// be written in JSON format to the given location instead of a single output line.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided
    /// together with --out, surveystats will check that the computed summary matches
    /// the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
