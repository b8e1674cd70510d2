pub use crate::model::*;

/// A builder for assembling a response table row by row.
///
/// ```
/// pub use likert_stats::builder::Builder;
/// # use likert_stats::AggregationErrors;
///
/// let mut builder = Builder::new(&["item_1".to_string(), "item_2".to_string()])?;
///
/// builder.add_row_codes(&["SS", "TS"])?;
/// builder.add_row_codes(&["S", ""])?;
///
/// let table = builder.build()?;
/// assert_eq!(table.num_participants(), 2);
///
/// # Ok::<(), AggregationErrors>(())
/// ```
pub struct Builder {
    pub(crate) _questions: Vec<String>,
    pub(crate) _rows: Vec<Vec<Option<Category>>>,
}

impl Builder {
    pub fn new(questions: &[String]) -> Result<Builder, AggregationErrors> {
        Ok(Builder {
            _questions: questions.to_vec(),
            _rows: Vec::new(),
        })
    }

    /// Adds one participant row from raw cell values.
    ///
    /// It is the simplest use case for most cases. Blank cells and values
    /// that are not one of the six codes become missing cells.
    pub fn add_row_codes(&mut self, codes: &[&str]) -> Result<(), AggregationErrors> {
        let cells: Vec<Option<Category>> =
            codes.iter().map(|code| Category::from_code(code)).collect();
        self.add_row(&cells)
    }

    /// Adds one participant row of typed cells.
    ///
    /// The row must have exactly one cell per question.
    pub fn add_row(&mut self, cells: &[Option<Category>]) -> Result<(), AggregationErrors> {
        if cells.len() != self._questions.len() {
            return Err(AggregationErrors::RaggedRow {
                row: self._rows.len(),
            });
        }
        self._rows.push(cells.to_vec());
        Ok(())
    }

    pub fn build(self) -> Result<ResponseTable, AggregationErrors> {
        ResponseTable::new(self._questions, self._rows)
    }
}
