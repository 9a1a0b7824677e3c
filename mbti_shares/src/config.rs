// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The 16 MBTI type codes.
///
/// The variants are declared in the canonical display order, which is also the order
/// of [MbtiType::CANONICAL_ORDER]. This order is fixed and does not depend on the
/// column order of the input file.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum MbtiType {
    Infj,
    Isfj,
    Intp,
    Isfp,
    Entp,
    Infp,
    Entj,
    Istp,
    Intj,
    Esfp,
    Estj,
    Enfp,
    Estp,
    Istj,
    Enfj,
    Esfj,
}

impl MbtiType {
    pub const COUNT: usize = 16;

    pub const CANONICAL_ORDER: [MbtiType; MbtiType::COUNT] = [
        MbtiType::Infj,
        MbtiType::Isfj,
        MbtiType::Intp,
        MbtiType::Isfp,
        MbtiType::Entp,
        MbtiType::Infp,
        MbtiType::Entj,
        MbtiType::Istp,
        MbtiType::Intj,
        MbtiType::Esfp,
        MbtiType::Estj,
        MbtiType::Enfp,
        MbtiType::Estp,
        MbtiType::Istj,
        MbtiType::Enfj,
        MbtiType::Esfj,
    ];

    /// The four-letter code, as it appears in the header of the input file.
    pub fn code(&self) -> &'static str {
        match self {
            MbtiType::Infj => "INFJ",
            MbtiType::Isfj => "ISFJ",
            MbtiType::Intp => "INTP",
            MbtiType::Isfp => "ISFP",
            MbtiType::Entp => "ENTP",
            MbtiType::Infp => "INFP",
            MbtiType::Entj => "ENTJ",
            MbtiType::Istp => "ISTP",
            MbtiType::Intj => "INTJ",
            MbtiType::Esfp => "ESFP",
            MbtiType::Estj => "ESTJ",
            MbtiType::Enfp => "ENFP",
            MbtiType::Estp => "ESTP",
            MbtiType::Istj => "ISTJ",
            MbtiType::Enfj => "ENFJ",
            MbtiType::Esfj => "ESFJ",
        }
    }

    /// Position in the canonical order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parses a header cell. Surrounding whitespace is ignored, the comparison is case-sensitive.
    pub fn from_code(code: &str) -> Option<MbtiType> {
        let code = code.trim();
        MbtiType::CANONICAL_ORDER
            .iter()
            .find(|t| t.code() == code)
            .copied()
    }
}

impl Display for MbtiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One row of the source table.
#[derive(PartialEq, Debug, Clone)]
pub struct CountryRow {
    pub country: String,
    /// Fractions in [0, 1], indexed by [MbtiType::index].
    pub shares: [f64; MbtiType::COUNT],
    /// Sum of the 16 shares.
    pub total: f64,
}

impl CountryRow {
    pub fn new(country: String, shares: [f64; MbtiType::COUNT]) -> CountryRow {
        let total: f64 = shares.iter().sum();
        CountryRow {
            country,
            shares,
            total,
        }
    }

    pub fn share(&self, mbti: MbtiType) -> f64 {
        self.shares[mbti.index()]
    }

    /// The shares paired with their type, in canonical order.
    pub fn type_shares(&self) -> impl Iterator<Item = (MbtiType, f64)> + '_ {
        MbtiType::CANONICAL_ORDER
            .iter()
            .map(move |t| (*t, self.share(*t)))
    }
}

// ******** Output data structures *********

/// One entry of the long-format comparison.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ComparisonRecord {
    pub mbti: MbtiType,
    /// Percentage in [0, 100] for the primary country.
    pub primary_share: f64,
    /// Percentage in [0, 100] for the compared country, if any.
    pub secondary_share: Option<f64>,
}

/// The long-format table handed to the chart.
///
/// Always contains one record per type, in canonical order.
#[derive(PartialEq, Debug, Clone)]
pub struct ComparisonTable {
    pub primary: String,
    pub secondary: Option<String>,
    /// Sum of the primary row's shares (fractions), kept for the sanity caption.
    pub primary_total: f64,
    pub records: Vec<ComparisonRecord>,
}

/// A row whose shares do not sum close enough to 1.
#[derive(PartialEq, Debug, Clone)]
pub struct SumDeviation {
    pub country: String,
    pub total: f64,
}

/// Errors that prevent a share table from being built.
#[derive(PartialEq, Debug, Clone)]
pub enum TableErrors {
    EmptyHeader,
    /// The first column is not the country column. Contains the name found instead.
    MissingCountryColumn(String),
    MissingTypeColumns(Vec<MbtiType>),
    DuplicateColumn(String),
    UnknownColumn(String),
    RowLength {
        lineno: usize,
        expected: usize,
        found: usize,
    },
    InvalidShare {
        lineno: usize,
        column: String,
        value: String,
    },
    ShareOutOfRange {
        lineno: usize,
        column: String,
        value: f64,
    },
    EmptyCountryName {
        lineno: usize,
    },
    DuplicateCountry {
        lineno: usize,
        country: String,
    },
    EmptyTable,
}

impl Error for TableErrors {}

impl Display for TableErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableErrors::EmptyHeader => write!(f, "the header row is empty"),
            TableErrors::MissingCountryColumn(found) => write!(
                f,
                "the first column must be named {:?}, found {:?}",
                crate::COUNTRY_COLUMN,
                found
            ),
            TableErrors::MissingTypeColumns(missing) => {
                let codes: Vec<&str> = missing.iter().map(|t| t.code()).collect();
                write!(f, "missing type columns: {}", codes.join(", "))
            }
            TableErrors::DuplicateColumn(name) => write!(f, "duplicate column {:?}", name),
            TableErrors::UnknownColumn(name) => write!(f, "unknown column {:?}", name),
            TableErrors::RowLength {
                lineno,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected {} fields, found {}",
                lineno, expected, found
            ),
            TableErrors::InvalidShare {
                lineno,
                column,
                value,
            } => write!(
                f,
                "line {}, column {}: {:?} is not a number",
                lineno, column, value
            ),
            TableErrors::ShareOutOfRange {
                lineno,
                column,
                value,
            } => write!(
                f,
                "line {}, column {}: share {} is outside [0, 1]",
                lineno, column, value
            ),
            TableErrors::EmptyCountryName { lineno } => {
                write!(f, "line {}: empty country name", lineno)
            }
            TableErrors::DuplicateCountry { lineno, country } => {
                write!(f, "line {}: duplicate country {:?}", lineno, country)
            }
            TableErrors::EmptyTable => write!(f, "the table has no rows"),
        }
    }
}

/// Errors that prevent a comparison from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ComparisonErrors {
    UnknownCountry(String),
    /// The compared country is the primary country.
    SameCountry(String),
}

impl Error for ComparisonErrors {}

impl Display for ComparisonErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonErrors::UnknownCountry(c) => write!(f, "unknown country {:?}", c),
            ComparisonErrors::SameCountry(c) => {
                write!(f, "cannot compare {:?} with itself", c)
            }
        }
    }
}
