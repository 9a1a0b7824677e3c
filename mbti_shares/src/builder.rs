use std::collections::HashSet;

use log::debug;

pub use crate::config::*;
use crate::{ShareTable, COUNTRY_COLUMN};

/// A builder for assembling a share table row by row.
///
/// The header is validated once, when the builder is created: the first column must be
/// the country column and the remaining columns must be exactly the 16 type codes, in any order.
///
/// ```
/// use mbti_shares::builder::TableBuilder;
/// use mbti_shares::{MbtiType, TableErrors};
///
/// let header: Vec<&str> = std::iter::once("Country")
///     .chain(MbtiType::CANONICAL_ORDER.iter().map(|t| t.code()))
///     .collect();
/// let mut builder = TableBuilder::new(&header)?;
///
/// let mut row = vec!["Atlantis"];
/// row.extend(std::iter::repeat("0.0625").take(16));
/// builder.add_row(2, &row)?;
///
/// let table = builder.build()?;
/// assert_eq!(table.len(), 1);
/// # Ok::<(), TableErrors>(())
/// ```
pub struct TableBuilder {
    // The type of each share column, in file order.
    columns: Vec<MbtiType>,
    rows: Vec<CountryRow>,
    countries: HashSet<String>,
}

impl TableBuilder {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Result<TableBuilder, TableErrors> {
        let (first, rest) = header.split_first().ok_or(TableErrors::EmptyHeader)?;
        let first = first.as_ref().trim().trim_start_matches('\u{feff}');
        if first != COUNTRY_COLUMN {
            return Err(TableErrors::MissingCountryColumn(first.to_string()));
        }

        let mut columns: Vec<MbtiType> = Vec::with_capacity(rest.len());
        let mut seen: HashSet<MbtiType> = HashSet::new();
        for name in rest.iter().map(|s| s.as_ref().trim()) {
            let mbti = MbtiType::from_code(name)
                .ok_or_else(|| TableErrors::UnknownColumn(name.to_string()))?;
            if !seen.insert(mbti) {
                return Err(TableErrors::DuplicateColumn(name.to_string()));
            }
            columns.push(mbti);
        }

        let missing: Vec<MbtiType> = MbtiType::CANONICAL_ORDER
            .iter()
            .filter(|t| !seen.contains(t))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(TableErrors::MissingTypeColumns(missing));
        }
        debug!("TableBuilder: column order {:?}", columns);

        Ok(TableBuilder {
            columns,
            rows: Vec::new(),
            countries: HashSet::new(),
        })
    }

    /// Adds one data row.
    ///
    /// `lineno` is only used to locate errors. The row is rejected as a whole: nothing is
    /// added if any field is invalid.
    pub fn add_row<S: AsRef<str>>(&mut self, lineno: usize, fields: &[S]) -> Result<(), TableErrors> {
        let expected = self.columns.len() + 1;
        if fields.len() != expected {
            return Err(TableErrors::RowLength {
                lineno,
                expected,
                found: fields.len(),
            });
        }

        let country = fields[0].as_ref().trim();
        if country.is_empty() {
            return Err(TableErrors::EmptyCountryName { lineno });
        }
        if self.countries.contains(country) {
            return Err(TableErrors::DuplicateCountry {
                lineno,
                country: country.to_string(),
            });
        }

        let mut shares = [0.0; MbtiType::COUNT];
        for (mbti, raw) in self.columns.iter().zip(fields[1..].iter()) {
            let raw = raw.as_ref().trim();
            let value: f64 = raw.parse().map_err(|_| TableErrors::InvalidShare {
                lineno,
                column: mbti.code().to_string(),
                value: raw.to_string(),
            })?;
            // NaN fails the range check as well.
            if !(0.0..=1.0).contains(&value) {
                return Err(TableErrors::ShareOutOfRange {
                    lineno,
                    column: mbti.code().to_string(),
                    value,
                });
            }
            shares[mbti.index()] = value;
        }

        let row = CountryRow::new(country.to_string(), shares);
        debug!(
            "add_row: lineno: {:?} country: {:?} total: {:?}",
            lineno, row.country, row.total
        );
        self.countries.insert(row.country.clone());
        self.rows.push(row);
        Ok(())
    }

    pub fn build(self) -> Result<ShareTable, TableErrors> {
        if self.rows.is_empty() {
            return Err(TableErrors::EmptyTable);
        }
        Ok(ShareTable::new(self.rows))
    }
}
