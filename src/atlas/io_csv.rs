// Primitives for reading the share table from CSV files.

use csv::StringRecord;
use log::{debug, info};
use mbti_shares::builder::TableBuilder;
use mbti_shares::ShareTable;
use snafu::prelude::*;

use crate::atlas::*;

pub fn read_share_table(path: &str) -> AtlasResult<ShareTable> {
    info!("Attempting to read share table {:?}", path);
    // Rows of the wrong length are reported by the builder with their line number.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_share_table: header: {:?}", header);
    let mut builder = TableBuilder::new(&header).context(InvalidTableSnafu { path })?;

    for (idx, record_r) in rdr.records().enumerate() {
        // The header is line 1.
        let default_lineno = idx + 2;
        let record: StringRecord = record_r.context(CsvLineParseSnafu {
            path,
            lineno: default_lineno,
        })?;
        let lineno = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(default_lineno);
        let fields: Vec<&str> = record.iter().collect();
        builder
            .add_row(lineno, &fields)
            .context(InvalidTableSnafu { path })?;
    }
    builder.build().context(InvalidTableSnafu { path })
}
