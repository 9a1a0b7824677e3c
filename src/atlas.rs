use log::{debug, info, warn};

use mbti_shares::*;
use once_cell::sync::OnceCell;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::atlas::chart::build_dashboard_js;
use crate::atlas::config_reader::*;
use crate::atlas::io_csv::read_share_table;

pub mod chart;
pub mod config_reader;
pub mod io_csv;

/// The data file read when neither the command line nor the configuration names one.
pub const DEFAULT_DATA_PATH: &str = "countriesMBTI_16types.csv";

#[derive(Debug, Snafu)]
pub enum AtlasError {
    #[snafu(display("Error opening data file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Malformed CSV in {path} at line {lineno}: {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Invalid share table in {path}: {source}"))]
    InvalidTable { source: TableErrors, path: String },
    #[snafu(display("The share table is already loaded"))]
    TableAlreadyLoaded {},
    #[snafu(display("The share table is not loaded"))]
    TableNotLoaded {},

    #[snafu(display("Cannot build the chart: {source}"))]
    Comparison { source: ComparisonErrors },

    #[snafu(display("Error opening {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("No parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error writing {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

impl AtlasError {
    /// The share table could not be loaded. This is fatal at startup.
    pub fn is_data_load(&self) -> bool {
        matches!(
            self,
            AtlasError::CsvOpen { .. }
                | AtlasError::CsvLineParse { .. }
                | AtlasError::InvalidTable { .. }
        )
    }

    pub fn is_unknown_country(&self) -> bool {
        matches!(
            self,
            AtlasError::Comparison {
                source: ComparisonErrors::UnknownCountry(_)
            }
        )
    }
}

pub type AtlasResult<T> = Result<T, AtlasError>;

static SHARE_TABLE: OnceCell<ShareTable> = OnceCell::new();

/// The table loaded by [load_shared_table].
pub fn share_table() -> AtlasResult<&'static ShareTable> {
    SHARE_TABLE.get().context(TableNotLoadedSnafu {})
}

/// Reads the share table and installs it for the rest of the process.
///
/// The table can only be loaded once.
pub fn load_shared_table(path: &str, tolerance: f64) -> AtlasResult<&'static ShareTable> {
    ensure!(SHARE_TABLE.get().is_none(), TableAlreadyLoadedSnafu {});
    let table = read_share_table(path)?;
    report_sum_check(&table, tolerance);
    if SHARE_TABLE.set(table).is_err() {
        return TableAlreadyLoadedSnafu {}.fail();
    }
    share_table()
}

/// Logs the rows whose shares do not sum to 1 within `tolerance`.
pub fn report_sum_check(table: &ShareTable, tolerance: f64) -> Vec<SumDeviation> {
    let deviations = table.sum_check(tolerance);
    for d in deviations.iter() {
        warn!(
            "The shares of {} sum to {:.4}, expected 1 (tolerance {})",
            d.country, d.total, tolerance
        );
    }
    deviations
}

/// The options of one run, after merging the command line and the configuration file.
#[derive(PartialEq, Debug, Clone)]
pub struct RunOptions {
    pub data_path: String,
    pub primary: Option<String>,
    pub compare: bool,
    pub secondary: Option<String>,
    pub tolerance: f64,
    pub out: Option<String>,
    pub reference: Option<String>,
    pub list: bool,
}

pub fn options_from_args(args: &Args) -> AtlasResult<RunOptions> {
    let config: Option<AtlasConfig> = match &args.config {
        Some(config_path) => Some(read_config(config_path)?),
        None => None,
    };
    let config_ref = config.as_ref();

    let tolerance = args
        .tolerance
        .or_else(|| config_ref.and_then(|c| c.sum_tolerance))
        .unwrap_or(DEFAULT_SUM_TOLERANCE);
    if !tolerance.is_finite() || tolerance < 0.0 {
        whatever!("The sum tolerance must be a non-negative number, got {}", tolerance);
    }

    let res = RunOptions {
        data_path: args
            .input
            .clone()
            .or_else(|| config_ref.map(|c| c.data_path.clone()))
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
        primary: args
            .country
            .clone()
            .or_else(|| config_ref.and_then(|c| c.primary_country.clone())),
        compare: args.compare
            || args.compare_country.is_some()
            || config_ref.and_then(|c| c.compare_enabled).unwrap_or(false),
        secondary: args
            .compare_country
            .clone()
            .or_else(|| config_ref.and_then(|c| c.secondary_country.clone())),
        tolerance,
        out: args
            .out
            .clone()
            .or_else(|| config_ref.and_then(|c| c.output.clone())),
        reference: args.reference.clone(),
        list: args.list,
    };
    debug!("options_from_args: {:?}", res);
    Ok(res)
}

/// The countries chosen for one chart.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Selection {
    pub primary: String,
    pub secondary: Option<String>,
}

/// Fills in the defaults of the selection widgets.
///
/// Without a primary country, the table default is used. When comparing without a second
/// country, the first other country in alphabetical order is used. When not comparing, the
/// second country is dropped.
pub fn resolve_selection(
    table: &ShareTable,
    primary: Option<&str>,
    compare: bool,
    secondary: Option<&str>,
) -> AtlasResult<Selection> {
    let primary = primary.unwrap_or_else(|| table.default_country()).to_string();
    let secondary = if !compare {
        if let Some(s) = secondary {
            debug!("resolve_selection: comparison is off, ignoring {:?}", s);
        }
        None
    } else {
        match secondary {
            Some(s) => Some(s.to_string()),
            None => match table.comparison_candidates(&primary).first() {
                Some(c) => Some(c.to_string()),
                None => whatever!("No other country to compare {} with", primary),
            },
        }
    };
    Ok(Selection { primary, secondary })
}

/// Builds the chart document for a selection.
pub fn render_dashboard(table: &ShareTable, selection: &Selection) -> AtlasResult<JSValue> {
    let comparison = build_comparison(
        table,
        selection.primary.as_str(),
        selection.secondary.as_deref(),
    )
    .context(ComparisonSnafu {})?;
    info!(
        "Chart for {} (compared with {:?}), total {:.4}",
        comparison.primary, comparison.secondary, comparison.primary_total
    );
    Ok(build_dashboard_js(&comparison))
}

pub fn run_atlas(opts: &RunOptions) -> AtlasResult<()> {
    let table = load_shared_table(opts.data_path.as_str(), opts.tolerance)?;
    run_with_table(table, opts)
}

pub fn run_with_table(table: &ShareTable, opts: &RunOptions) -> AtlasResult<()> {
    if opts.list {
        print_countries(table);
        return Ok(());
    }

    let selection = resolve_selection(
        table,
        opts.primary.as_deref(),
        opts.compare,
        opts.secondary.as_deref(),
    )?;
    let dashboard_js = render_dashboard(table, &selection)?;
    let pretty_js = serde_json::to_string_pretty(&dashboard_js).context(ParsingJsonSnafu {})?;

    write_output(opts.out.as_deref(), &pretty_js)?;

    // The reference document, if provided for comparison
    if let Some(reference_p) = &opts.reference {
        check_reference(reference_p, &pretty_js)?;
    }
    Ok(())
}

fn print_countries(table: &ShareTable) {
    for country in table.countries() {
        if let Some(row) = table.get(country) {
            println!("{}\t{:.4}", country, row.total);
        }
    }
}

fn write_output(out: Option<&str>, contents: &str) -> AtlasResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", contents);
        }
        Some(path) => {
            fs::write(path, contents).context(WritingOutputSnafu { path })?;
            info!("Chart document written to {}", path);
        }
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js: &str) -> AtlasResult<()> {
    let reference_js = read_reference(reference_path)?;
    let pretty_js_ref =
        serde_json::to_string_pretty(&reference_js).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        whatever!(
            "Difference detected between the chart document and the reference {}",
            reference_path
        )
    }
    info!("The chart document matches the reference {}", reference_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn data_path(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mbtiatlas-{}-{}.json", std::process::id(), name))
    }

    fn sample_table() -> ShareTable {
        read_share_table(&data_path("countries_sample.csv")).unwrap()
    }

    fn options(out: Option<String>) -> RunOptions {
        RunOptions {
            data_path: data_path("countries_sample.csv"),
            primary: Some("South Korea".to_string()),
            compare: true,
            secondary: Some("United States".to_string()),
            tolerance: DEFAULT_SUM_TOLERANCE,
            out,
            reference: None,
            list: false,
        }
    }

    #[test]
    fn shared_table_loads_once() {
        init();
        let table = load_shared_table(&data_path("countries_sample.csv"), 0.01).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(share_table().unwrap(), table);
        let again = load_shared_table(&data_path("countries_sample.csv"), 0.01);
        assert!(matches!(again, Err(AtlasError::TableAlreadyLoaded {})));
    }

    #[test]
    fn sum_check_warns_without_failing() {
        init();
        let table = read_share_table(&data_path("sum_off.csv")).unwrap();
        let deviations = report_sum_check(&table, DEFAULT_SUM_TOLERANCE);
        assert_eq!(deviations.len(), 1);
        assert_eq!(deviations[0].country, "Nowhere");

        let table = sample_table();
        assert!(report_sum_check(&table, DEFAULT_SUM_TOLERANCE).is_empty());
        // Brazil sums to 0.9998.
        assert_eq!(report_sum_check(&table, 1e-5).len(), 1);
    }

    #[test]
    fn selection_defaults() {
        init();
        let table = sample_table();

        let s = resolve_selection(&table, None, false, None).unwrap();
        assert_eq!(s.primary, "South Korea");
        assert_eq!(s.secondary, None);

        let s = resolve_selection(&table, Some("Japan"), false, Some("Brazil")).unwrap();
        assert_eq!(s.secondary, None);

        let s = resolve_selection(&table, None, true, None).unwrap();
        assert_eq!(s.secondary.as_deref(), Some("Brazil"));

        let s = resolve_selection(&table, Some("Brazil"), true, None).unwrap();
        assert_eq!(s.secondary.as_deref(), Some("Japan"));
    }

    #[test]
    fn selection_needs_two_countries_to_compare() {
        init();
        let header: Vec<&str> = std::iter::once("Country")
            .chain(MbtiType::CANONICAL_ORDER.iter().map(|t| t.code()))
            .collect();
        let mut alone = vec!["Alone"];
        alone.extend(std::iter::repeat("0.0625").take(16));
        let table = ShareTable::from_records(&header, &[alone]).unwrap();
        assert!(resolve_selection(&table, None, false, None).is_ok());
        assert!(resolve_selection(&table, None, true, None).is_err());
    }

    #[test]
    fn unknown_country_produces_no_output() {
        init();
        let table = sample_table();
        let out = temp_path("unknown");
        let _ = fs::remove_file(&out);
        let mut opts = options(Some(out.display().to_string()));
        opts.primary = Some("Atlantis".to_string());

        let err = run_with_table(&table, &opts).unwrap_err();
        assert!(err.is_unknown_country());
        assert!(!err.is_data_load());
        assert!(!out.exists());
    }

    #[test]
    fn same_country_is_rejected() {
        init();
        let table = sample_table();
        let mut opts = options(None);
        opts.secondary = Some("South Korea".to_string());
        let err = run_with_table(&table, &opts).unwrap_err();
        assert!(matches!(
            err,
            AtlasError::Comparison {
                source: ComparisonErrors::SameCountry(_)
            }
        ));
    }

    #[test]
    fn output_matches_its_reference() {
        init();
        let table = sample_table();
        let first = temp_path("reference");
        run_with_table(&table, &options(Some(first.display().to_string()))).unwrap();

        let written: JSValue =
            serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
        assert_eq!(written["country"], "South Korea");
        assert_eq!(written["compareCountry"], "United States");
        assert_eq!(written["records"].as_array().unwrap().len(), 16);

        let second = temp_path("checked");
        let mut opts = options(Some(second.display().to_string()));
        opts.reference = Some(first.display().to_string());
        assert!(run_with_table(&table, &opts).is_ok());

        // The same reference no longer matches once the comparison is dropped.
        opts.compare = false;
        assert!(run_with_table(&table, &opts).is_err());

        let _ = fs::remove_file(&first);
        let _ = fs::remove_file(&second);
    }

    #[test]
    fn options_merge_config_and_args() {
        init();
        let config_path = data_path("sample_config.json");
        let args = Args::parse_from(["mbtiatlas", "--config", config_path.as_str()]);
        let opts = options_from_args(&args).unwrap();
        assert_eq!(opts.data_path, data_path("countries_sample.csv"));
        assert_eq!(opts.primary.as_deref(), Some("Japan"));
        assert!(opts.compare);
        assert_eq!(opts.secondary.as_deref(), Some("Brazil"));
        assert_eq!(opts.tolerance, 0.001);
        assert_eq!(opts.out, None);

        let args = Args::parse_from([
            "mbtiatlas",
            "--config",
            config_path.as_str(),
            "--country",
            "South Korea",
            "--tolerance",
            "0.05",
            "--out",
            "stdout",
        ]);
        let opts = options_from_args(&args).unwrap();
        assert_eq!(opts.primary.as_deref(), Some("South Korea"));
        assert_eq!(opts.tolerance, 0.05);
        assert_eq!(opts.out.as_deref(), Some("stdout"));
    }

    #[test]
    fn options_without_config() {
        let args = Args::parse_from(["mbtiatlas", "--compare-country", "Japan"]);
        let opts = options_from_args(&args).unwrap();
        assert_eq!(opts.data_path, DEFAULT_DATA_PATH);
        assert!(opts.compare);
        assert_eq!(opts.tolerance, DEFAULT_SUM_TOLERANCE);

        let args = Args::parse_from(["mbtiatlas", "--tolerance=-1"]);
        assert!(options_from_args(&args).is_err());
    }
}
