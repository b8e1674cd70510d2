/*!

# Manual

This library computes descriptive statistics over a six-point Likert-scale
survey. The input is a rectangular table of categorical responses: one row
per participant, one column per survey item, and each cell either blank or
one of the six codes `SS`, `S`, `CS`, `CTS`, `TS`, `STS`.

## Scores and sentiments

Every code carries a fixed ordinal score and a fixed sentiment bucket:

| Code | Score | Sentiment |
|------|-------|-----------|
| SS   | 6     | positif   |
| S    | 5     | positif   |
| CS   | 4     | netral    |
| CTS  | 3     | negatif   |
| TS   | 2     | negatif   |
| STS  | 1     | negatif   |

Both mappings are process-wide constants; there is no way to configure
them. Missing cells are excluded from every count and every denominator.

## Statistics

The closed set of operations is described by the [crate::Statistic]
enumeration:

- the most and least frequent answer over all the cells, with count and
  share of the answered cells;
- the question with the highest count for one given category, with the
  share of participants;
- the per-question share of participants for a rare category, listing
  only the questions where the category occurs;
- the overall average score and the per-question best and worst average
  scores;
- the breakdown of the answers into the three sentiment buckets.

All the operations are pure and deterministic: the same table always
produces the same outcome, and ties are resolved by the fixed code order
(for frequencies) or the table column order (for per-question extrema).

## Empty aggregations

An extremum over an empty set of counts is undefined. Instead of
returning a zero result, the operations fail with
[crate::AggregationErrors::EmptyAggregation] so that the caller can
distinguish "no data" from a real zero.

## Building a table

Use the [crate::builder::Builder] to assemble a table from rows of raw
cell values, or [crate::ResponseTable::new] when the cells are already
typed. The command line front end builds the table from a spreadsheet
and strips the participant identifier column before handing it to this
library.

*/
