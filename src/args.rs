use clap::Parser;

/// Compares the MBTI type distribution of countries and produces a chart of it.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the options of the dashboard. See the manual for
    /// the format. The options passed on the command line override the ones in this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default countriesMBTI_16types.csv) The CSV file with the shares of each
    /// type per country.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (country name, optional) The country to display. Defaults to South Korea if present in
    /// the data, otherwise to the first country in alphabetical order.
    #[clap(long, value_parser)]
    pub country: Option<String>,

    /// If passed as an argument, a second country is drawn as a line over the bars.
    #[clap(long, takes_value = false)]
    pub compare: bool,

    /// (country name, optional) The country to compare with. Implies --compare.
    #[clap(long, value_parser)]
    pub compare_country: Option<String>,

    /// (number, default 0.01) Rows whose shares sum further than this from 1 are reported.
    #[clap(long, value_parser)]
    pub tolerance: Option<f64>,

    /// (file path, 'stdout' or empty) Where to write the chart document in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference chart document. If provided, mbtiatlas checks that its output
    /// matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, prints the countries available in the data and exits.
    #[clap(long, takes_value = false)]
    pub list: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
