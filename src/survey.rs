use log::{debug, info, warn};

use likert_stats::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

/// The column holding the participant identifier when none is specified.
pub const DEFAULT_PARTICIPANT_COLUMN: &str = "Partisipan";

/// All the recognized statistic selectors, in output order.
pub const ALL_SELECTORS: [&str; 13] = [
    "q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8", "q9", "q10", "q11", "q12", "q13",
];

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Cannot open the data file {path}"))]
    MissingDataSource {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Cannot open the data file {path}"))]
    MissingCsvSource { source: csv::Error, path: String },
    #[snafu(display("The data file {path} has no content"))]
    EmptyWorkbook { path: String },
    #[snafu(display("Missing worksheet {name} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The workbook {path} has several worksheets, the worksheet name must be provided"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Line {lineno}: cell with an unexpected type: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Line {lineno}: row does not match the header"))]
    CsvLineTooShort { lineno: u64 },
    #[snafu(display("Failed to parse a CSV record"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display(
        "No question column detected: no column has a majority of SS/S/CS/CTS/TS/STS values"
    ))]
    NoQuestionColumns {},
    #[snafu(display("Several columns share the name {name}"))]
    DuplicateColumn { name: String },
    #[snafu(display("Unknown selector {selector}"))]
    UnknownSelector { selector: String },
    #[snafu(display("Unknown input type {input_type}"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Selector {selector}: {source}"))]
    EmptyAggregation {
        source: AggregationErrors,
        selector: String,
    },
    #[snafu(display("The rows of the table do not match the question columns"))]
    TableShape { source: AggregationErrors },
    #[snafu(display("Failed to read the selector from the standard input"))]
    ReadingSelector { source: std::io::Error },
    #[snafu(display("Error accessing {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Failed to process JSON content"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// A table as parsed by the readers: header names and raw string cells.
/// This is before question-column detection and category validation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Maps a selector string to its statistic.
///
/// q7 and q8 are both tabulated against TS, which keeps the historical
/// selector table intact.
pub fn parse_selector(selector: &str) -> SurveyResult<Statistic> {
    let stat = match selector {
        "q1" => Statistic::MostFrequentAnswer,
        "q2" => Statistic::LeastFrequentAnswer,
        "q3" => Statistic::TopQuestionFor(Category::Ss),
        "q4" => Statistic::TopQuestionFor(Category::S),
        "q5" => Statistic::TopQuestionFor(Category::Cs),
        "q6" => Statistic::TopQuestionFor(Category::Cts),
        "q7" | "q8" => Statistic::TopQuestionFor(Category::Ts),
        "q9" => Statistic::RareCategoryBreakdown(Category::Sts),
        "q10" => Statistic::OverallAverageScore,
        "q11" => Statistic::BestQuestionAverage,
        "q12" => Statistic::WorstQuestionAverage,
        "q13" => Statistic::SentimentBreakdown,
        _ => {
            return UnknownSelectorSnafu { selector }.fail();
        }
    };
    Ok(stat)
}

/// Renders one outcome as its single output line.
///
/// The per-statistic precision is part of the external contract:
/// frequencies and shares use one decimal, average scores use two.
pub fn format_outcome(outcome: &StatisticOutcome) -> String {
    match outcome {
        StatisticOutcome::Frequency(f) => {
            format!("{}|{}|{:.1}", f.category.code(), f.count, f.percentage)
        }
        StatisticOutcome::QuestionCount(qc) => {
            format!("{}|{}|{:.1}", qc.question, qc.count, qc.percentage)
        }
        StatisticOutcome::Breakdown(shares) => shares
            .iter()
            .map(|s| format!("{}:{:.1}", s.question, s.percentage))
            .collect::<Vec<String>>()
            .join("|"),
        StatisticOutcome::Average(avg) => format!("{:.2}", avg),
        StatisticOutcome::QuestionAverage(qa) => {
            format!("{}:{:.2}", qa.question, qa.average)
        }
        StatisticOutcome::Sentiment(buckets) => buckets
            .iter()
            .map(|b| format!("{}={}:{:.1}", b.sentiment.label(), b.count, b.percentage))
            .collect::<Vec<String>>()
            .join("|"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryConfig {
    pub input: String,
    pub participants: usize,
    pub questions: Vec<String>,
}

/// Assembles the JSON summary with one formatted line per selector.
///
/// A selector whose statistic has no qualifying data is omitted: a
/// statistic is either fully computed or not produced at all.
fn build_summary(args: &Args, table: &ResponseTable) -> JSValue {
    let mut results: JSMap<String, JSValue> = JSMap::new();
    for selector in ALL_SELECTORS {
        if let Ok(stat) = parse_selector(selector) {
            match run_statistic(table, &stat) {
                Ok(outcome) => {
                    results.insert(selector.to_string(), json!(format_outcome(&outcome)));
                }
                Err(e) => {
                    warn!("build_summary: skipping selector {}: {}", selector, e);
                }
            }
        }
    }
    let config = SummaryConfig {
        input: args.input.clone(),
        participants: table.num_participants(),
        questions: table.questions().to_vec(),
    };
    json!({ "config": config, "results": results })
}

pub fn read_summary(path: String) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn check_against_reference(path: String, pretty_js_stats: &str) -> SurveyResult<()> {
    let summary_ref = read_summary(path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between computed summary and reference summary");
    }
    Ok(())
}

fn read_selector_from_stdin() -> SurveyResult<String> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context(ReadingSelectorSnafu {})?;
    Ok(line.trim().to_string())
}

fn read_raw_table(args: &Args) -> SurveyResult<RawTable> {
    let input_type = match &args.input_type {
        Some(s) => s.to_lowercase(),
        None => Path::new(args.input.as_str())
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("xlsx")
            .to_lowercase(),
    };
    info!(
        "Attempting to read data file {:?} as {:?}",
        args.input, input_type
    );
    match input_type.as_str() {
        "xlsx" => io_xlsx::read_xlsx_table(args.input.clone(), &args.excel_worksheet_name),
        "csv" => io_csv::read_csv_table(args.input.clone()),
        _ => UnknownInputTypeSnafu { input_type }.fail(),
    }
}

/// Runs one tabulation end to end: load the table, resolve the selector,
/// compute the statistic and print its line. With --out, writes the JSON
/// summary of all the statistics instead.
pub fn run_survey(args: &Args) -> SurveyResult<()> {
    let raw = read_raw_table(args)?;
    debug!("run_survey: raw table: {:?}", raw);

    let participant_column = args
        .participant_column
        .clone()
        .unwrap_or_else(|| DEFAULT_PARTICIPANT_COLUMN.to_string());
    let table = io_common::build_response_table(&raw, &participant_column)?;
    info!(
        "run_survey: {:?} participants, question columns: {:?}",
        table.num_participants(),
        table.questions()
    );

    if let Some(out) = &args.out {
        let summary = build_summary(args, &table);
        let pretty_js_stats =
            serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
        if out == "stdout" {
            println!("{}", pretty_js_stats);
        } else {
            fs::write(out, &pretty_js_stats).context(OpeningJsonSnafu { path: out.clone() })?;
        }
        if let Some(reference) = &args.reference {
            check_against_reference(reference.clone(), &pretty_js_stats)?;
        }
        return Ok(());
    }

    let selector_raw = match &args.selector {
        Some(s) => s.clone(),
        None => read_selector_from_stdin()?,
    };
    let selector = selector_raw.trim();
    let stat = parse_selector(selector)?;
    debug!("run_survey: selector {:?} -> {:?}", selector, stat);

    let outcome = run_statistic(&table, &stat).context(EmptyAggregationSnafu { selector })?;
    println!("{}", format_outcome(&outcome));
    Ok(())
}
