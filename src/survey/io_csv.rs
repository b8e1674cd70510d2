// Primitives for reading CSV exports of the survey spreadsheet.

use log::debug;
use snafu::prelude::*;

use crate::survey::io_common::check_unique_columns;
use crate::survey::{
    CsvLineParseSnafu, CsvLineTooShortSnafu, EmptyWorkbookSnafu, MissingCsvSourceSnafu, RawTable,
    SurveyResult,
};

pub fn read_csv_table(path: String) -> SurveyResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.clone())
        .context(MissingCsvSourceSnafu { path: path.clone() })?;
    let mut records = rdr.into_records();

    let header = records
        .next()
        .context(EmptyWorkbookSnafu { path: path.clone() })?
        .context(CsvLineParseSnafu {})?;
    let columns: Vec<String> = header.iter().map(|s| s.trim().to_string()).collect();
    debug!("read_csv_table: header: {:?}", columns);
    check_unique_columns(&columns)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = (idx + 2) as u64;
        let line = line_r.context(CsvLineParseSnafu {})?;
        ensure!(line.len() == columns.len(), CsvLineTooShortSnafu { lineno });
        rows.push(line.iter().map(|s| s.trim().to_string()).collect());
    }
    debug!("read_csv_table: read {:?} data rows", rows.len());
    Ok(RawTable { columns, rows })
}
