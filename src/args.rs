use clap::Parser;

/// Scores a sociometry survey and draws the sociogram of the class.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the survey: input files, outputs and layout.
    /// Options given on the command line override the ones of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The answers of the survey, one row per student.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv) The type of the input. Inferred from the file extension when not provided.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, the name of the worksheet to use. Defaults to the first worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (PAUD, SD, SMP or SMA) The school level of the class. Prints the questionnaire of this level.
    #[clap(short, long, value_parser)]
    pub level: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the results will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, the program checks that the
    /// computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path) Writes the ranked table (Nama, Skor Popularitas, Interpretasi) as CSV.
    #[clap(long, value_parser)]
    pub table: Option<String>,

    /// (file path) Writes the ranked table in a Word document when the path ends with '.docx',
    /// in a Markdown document otherwise.
    #[clap(long, value_parser)]
    pub report: Option<String>,

    /// (file path) Draws the sociogram as a PNG image, or SVG when the path ends with '.svg'.
    #[clap(long, value_parser)]
    pub sociogram: Option<String>,

    /// (number, default 42) The seed of the sociogram layout.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
