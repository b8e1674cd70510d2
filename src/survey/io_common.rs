// Turning a raw table into a validated response table.

use log::debug;
use snafu::prelude::*;

use likert_stats::builder::Builder;
use likert_stats::{Category, ResponseTable};

use crate::survey::{
    DuplicateColumnSnafu, NoQuestionColumnsSnafu, RawTable, SurveyResult, TableShapeSnafu,
};

/// Checks that a parsed header has no repeated column name.
///
/// Two columns with the same name would merge into a single identity in
/// the statistics and the JSON summary, so the readers reject the table
/// up front.
pub fn check_unique_columns(columns: &[String]) -> SurveyResult<()> {
    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    for name in columns.iter() {
        ensure!(
            seen.insert(name.as_str()),
            DuplicateColumnSnafu { name: name.clone() }
        );
    }
    Ok(())
}

/// Finds the question columns of a raw table.
///
/// A column qualifies when strictly more than half of its values are one
/// of the six category codes. This is the detection rule applied when the
/// column set is not declared up front.
pub fn detect_question_columns(raw: &RawTable) -> Vec<usize> {
    let num_rows = raw.rows.len();
    (0..raw.columns.len())
        .filter(|&idx| {
            let valid = raw
                .rows
                .iter()
                .filter(|row| Category::from_code(row[idx].as_str()).is_some())
                .count();
            valid * 2 > num_rows
        })
        .collect()
}

/// Builds the response table handed to the aggregation library.
///
/// The participant column is excluded by name, the question columns are
/// detected, and every cell that is not one of the six codes becomes a
/// missing cell.
pub fn build_response_table(
    raw: &RawTable,
    participant_column: &str,
) -> SurveyResult<ResponseTable> {
    let question_idx: Vec<usize> = detect_question_columns(raw)
        .into_iter()
        .filter(|&idx| raw.columns[idx] != participant_column)
        .collect();
    ensure!(!question_idx.is_empty(), NoQuestionColumnsSnafu {});

    let questions: Vec<String> = question_idx
        .iter()
        .map(|&idx| raw.columns[idx].clone())
        .collect();
    debug!("build_response_table: question columns: {:?}", questions);

    let mut builder = Builder::new(&questions).context(TableShapeSnafu {})?;
    for row in raw.rows.iter() {
        let cells: Vec<Option<Category>> = question_idx
            .iter()
            .map(|&idx| Category::from_code(row[idx].as_str()))
            .collect();
        builder.add_row(&cells).context(TableShapeSnafu {})?;
    }
    builder.build().context(TableShapeSnafu {})
}
