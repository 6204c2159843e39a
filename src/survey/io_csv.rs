// Primitives for reading CSV files.

use std::io::Read;

use csv::ReaderBuilder;

use crate::survey::{io_common::normalize_cell, *};

/// Reads a CSV export of the survey. The first line holds the column names.
pub fn read_csv_table(path: &str) -> SurveyResult<ResponseTable> {
    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr, path)
}

fn read_records<R: Read>(rdr: csv::Reader<R>, path: &str) -> SurveyResult<ResponseTable> {
    let mut table = ResponseTable::default();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<Option<String>> = line.iter().map(normalize_cell).collect();
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, &cells);
        if lineno == 1 {
            table.header = cells;
        } else {
            table.rows.push(cells);
        }
    }
    if table.header.is_empty() {
        warn!("read_csv_table: {:?}: empty file", path);
    }
    Ok(table)
}
