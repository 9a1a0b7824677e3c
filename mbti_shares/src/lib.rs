mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;

/// Name of the first column of the input table.
pub const COUNTRY_COLUMN: &str = "Country";

/// Rows whose shares sum further than this from 1.0 are reported.
pub const DEFAULT_SUM_TOLERANCE: f64 = 0.01;

/// The country selected when nothing else is requested, if the table contains it.
pub const DEFAULT_COUNTRY: &str = "South Korea";

/// The loaded table of shares. It is never modified after construction.
#[derive(PartialEq, Debug, Clone)]
pub struct ShareTable {
    // Rows in file order.
    rows: Vec<CountryRow>,
    by_country: HashMap<String, usize>,
    // Invariant: never empty.
    sorted_countries: Vec<String>,
}

impl ShareTable {
    // The builder guarantees that rows are non-empty and countries unique.
    pub(crate) fn new(rows: Vec<CountryRow>) -> ShareTable {
        let by_country: HashMap<String, usize> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.country.clone(), idx))
            .collect();
        let mut sorted_countries: Vec<String> = rows.iter().map(|r| r.country.clone()).collect();
        sorted_countries.sort();
        info!("Loaded share table with {} countries", rows.len());
        ShareTable {
            rows,
            by_country,
            sorted_countries,
        }
    }

    /// Builds a table out of a header and raw records.
    ///
    /// The records are numbered from line 2, the header being line 1.
    pub fn from_records<S, R>(header: &[S], records: &[R]) -> Result<ShareTable, TableErrors>
    where
        S: AsRef<str>,
        R: AsRef<[S]>,
    {
        let mut builder = builder::TableBuilder::new(header)?;
        for (idx, record) in records.iter().enumerate() {
            builder.add_row(idx + 2, record.as_ref())?;
        }
        builder.build()
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a table coming out of [builder::TableBuilder::build].
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a country. Surrounding whitespace in the request is ignored.
    pub fn get(&self, country: &str) -> Option<&CountryRow> {
        self.by_country
            .get(country.trim())
            .map(|idx| &self.rows[*idx])
    }

    /// All the country names, sorted.
    pub fn countries(&self) -> &[String] {
        &self.sorted_countries
    }

    /// [DEFAULT_COUNTRY] if present, otherwise the first country in sorted order.
    pub fn default_country(&self) -> &str {
        match self.get(DEFAULT_COUNTRY) {
            Some(row) => row.country.as_str(),
            None => self.sorted_countries[0].as_str(),
        }
    }

    /// The countries that may be compared with `primary`, sorted.
    pub fn comparison_candidates(&self, primary: &str) -> Vec<&str> {
        let primary = primary.trim();
        self.sorted_countries
            .iter()
            .map(|c| c.as_str())
            .filter(|c| *c != primary)
            .collect()
    }

    /// The rows whose total is further than `tolerance` from 1.0, in file order.
    pub fn sum_check(&self, tolerance: f64) -> Vec<SumDeviation> {
        self.rows
            .iter()
            .filter(|row| (row.total - 1.0).abs() > tolerance)
            .map(|row| SumDeviation {
                country: row.country.clone(),
                total: row.total,
            })
            .collect()
    }
}

pub fn to_percentage(share: f64) -> f64 {
    share * 100.0
}

/// Inverse of [to_percentage].
pub fn from_percentage(percentage: f64) -> f64 {
    percentage / 100.0
}

/// Reshapes the selected rows into one record per type, in canonical order.
///
/// Arguments:
/// * `table` the loaded shares
/// * `primary` the country drawn as bars
/// * `secondary` the country drawn as a comparison line, if any. It must differ from `primary`.
///
/// ```
/// use mbti_shares::{build_comparison, ShareTable, TableErrors, MbtiType};
///
/// let header: Vec<&str> = std::iter::once("Country")
///     .chain(MbtiType::CANONICAL_ORDER.iter().map(|t| t.code()))
///     .collect();
/// let mut row = vec!["Atlantis"];
/// row.extend(std::iter::repeat("0.0625").take(16));
/// let table = ShareTable::from_records(&header, &[row])?;
///
/// let comparison = build_comparison(&table, "Atlantis", None).unwrap();
/// assert_eq!(comparison.records.len(), 16);
/// assert_eq!(comparison.records[0].primary_share, 6.25);
/// # Ok::<(), TableErrors>(())
/// ```
pub fn build_comparison(
    table: &ShareTable,
    primary: &str,
    secondary: Option<&str>,
) -> Result<ComparisonTable, ComparisonErrors> {
    let primary_row = table
        .get(primary)
        .ok_or_else(|| ComparisonErrors::UnknownCountry(primary.to_string()))?;
    let secondary_row = match secondary {
        Some(name) => {
            let row = table
                .get(name)
                .ok_or_else(|| ComparisonErrors::UnknownCountry(name.to_string()))?;
            if row.country == primary_row.country {
                return Err(ComparisonErrors::SameCountry(row.country.clone()));
            }
            Some(row)
        }
        None => None,
    };
    debug!(
        "build_comparison: primary: {:?} secondary: {:?}",
        primary_row.country,
        secondary_row.map(|r| &r.country)
    );

    let records: Vec<ComparisonRecord> = MbtiType::CANONICAL_ORDER
        .iter()
        .map(|mbti| ComparisonRecord {
            mbti: *mbti,
            primary_share: to_percentage(primary_row.share(*mbti)),
            secondary_share: secondary_row.map(|r| to_percentage(r.share(*mbti))),
        })
        .collect();

    Ok(ComparisonTable {
        primary: primary_row.country.clone(),
        secondary: secondary_row.map(|r| r.country.clone()),
        primary_total: primary_row.total,
        records,
    })
}
