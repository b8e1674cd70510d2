// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use crate::survey::io_common::check_unique_columns;
use crate::survey::{
    AmbiguousWorksheetSnafu, EmptyWorkbookSnafu, ExcelWrongCellTypeSnafu, MissingDataSourceSnafu,
    MissingWorksheetSnafu, RawTable, SurveyResult,
};

pub fn read_xlsx_table(path: String, worksheet_name: &Option<String>) -> SurveyResult<RawTable> {
    let wrange = get_range(&path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyWorkbookSnafu { path: path.clone() })?;
    debug!("read_xlsx_table: header: {:?}", header);
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            DataType::String(s) => s.trim().to_string(),
            // Unnamed columns never qualify as question columns, give them
            // a placeholder name.
            _ => format!("column_{}", idx + 1),
        })
        .collect();
    check_unique_columns(&columns)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let mut cells: Vec<String> = Vec::with_capacity(columns.len());
        for cell in row.iter() {
            let v = match cell {
                DataType::String(s) => s.trim().to_string(),
                DataType::Empty => String::new(),
                // Numeric cells show up in the participant identifier
                // column and are kept as their textual form.
                DataType::Float(f) => f.to_string(),
                DataType::Int(i) => i.to_string(),
                _ => {
                    return ExcelWrongCellTypeSnafu {
                        lineno: (idx + 2) as u64,
                        content: format!("{:?}", cell),
                    }
                    .fail();
                }
            };
            cells.push(v);
        }
        rows.push(cells);
    }
    debug!("read_xlsx_table: read {:?} data rows", rows.len());
    Ok(RawTable { columns, rows })
}

fn get_range(
    path: &String,
    worksheet_name_o: &Option<String>,
) -> SurveyResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let p = path.clone();
    let mut workbook: Xlsx<_> =
        open_workbook(p).context(MissingDataSourceSnafu { path: path.clone() })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
                path: path.clone(),
            })?
            .context(MissingDataSourceSnafu { path: path.clone() })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyWorkbookSnafu { path: path.clone() }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "get_range: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path: path.clone() }.fail(),
        }
    }
}
