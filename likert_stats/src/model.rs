// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One of the six Likert response codes accepted on a survey form.
///
/// The enumeration order (SS, S, CS, CTS, TS, STS) is the natural order of
/// the codes on the form, from strongest agreement to strongest
/// disagreement. This order is also the tie-breaking order for the
/// frequency statistics.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    Ss = 0,
    S = 1,
    Cs = 2,
    Cts = 3,
    Ts = 4,
    Sts = 5,
}

impl Category {
    /// All the categories, in enumeration order.
    pub const ALL: [Category; 6] = [
        Category::Ss,
        Category::S,
        Category::Cs,
        Category::Cts,
        Category::Ts,
        Category::Sts,
    ];

    /// The code of this category as it appears in a survey cell.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Ss => "SS",
            Category::S => "S",
            Category::Cs => "CS",
            Category::Cts => "CTS",
            Category::Ts => "TS",
            Category::Sts => "STS",
        }
    }

    /// Parses a cell value. Only the six exact codes are recognized.
    pub fn from_code(code: &str) -> Option<Category> {
        match code {
            "SS" => Some(Category::Ss),
            "S" => Some(Category::S),
            "CS" => Some(Category::Cs),
            "CTS" => Some(Category::Cts),
            "TS" => Some(Category::Ts),
            "STS" => Some(Category::Sts),
            _ => None,
        }
    }

    /// The ordinal score of this category: STS=1 up to SS=6.
    pub fn score(&self) -> u32 {
        match self {
            Category::Ss => 6,
            Category::S => 5,
            Category::Cs => 4,
            Category::Cts => 3,
            Category::Ts => 2,
            Category::Sts => 1,
        }
    }

    /// The sentiment bucket this category maps to.
    pub fn sentiment(&self) -> Sentiment {
        match self {
            Category::Ss | Category::S => Sentiment::Positive,
            Category::Cs => Sentiment::Neutral,
            Category::Cts | Category::Ts | Category::Sts => Sentiment::Negative,
        }
    }
}

/// The three sentiment buckets derived from the categories.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// The label used in the text output.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positif",
            Sentiment::Neutral => "netral",
            Sentiment::Negative => "negatif",
        }
    }
}

/// The responses of all the participants to the question columns of a
/// survey, with the participant identifier column already stripped.
///
/// The table is rectangular: every row has one cell per question, and a
/// cell is either a category or missing. It is immutable after
/// construction, so every statistic is a pure function of the table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseTable {
    questions: Vec<String>,
    rows: Vec<Vec<Option<Category>>>,
}

impl ResponseTable {
    /// Builds a table from question names and participant rows.
    ///
    /// Every row must have exactly one cell per question.
    pub fn new(
        questions: Vec<String>,
        rows: Vec<Vec<Option<Category>>>,
    ) -> Result<ResponseTable, AggregationErrors> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != questions.len() {
                return Err(AggregationErrors::RaggedRow { row: idx });
            }
        }
        Ok(ResponseTable { questions, rows })
    }

    /// The question column names, in the order they appear in the source.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// The number of participant rows, including rows with missing cells.
    pub fn num_participants(&self) -> usize {
        self.rows.len()
    }

    /// All the non-missing cells of the table, flattened row by row.
    pub fn cells(&self) -> impl Iterator<Item = Category> + '_ {
        self.rows.iter().flatten().filter_map(|c| *c)
    }

    /// The non-missing cells of one question column.
    pub fn question_cells(&self, question_idx: usize) -> impl Iterator<Item = Category> + '_ {
        self.rows.iter().filter_map(move |row| row[question_idx])
    }
}

// ******** Output data structures *********

/// The most or least frequent answer over the whole table.
#[derive(PartialEq, Debug, Clone)]
pub struct AnswerFrequency {
    pub category: Category,
    pub count: u64,
    /// Share of all the non-missing cells, in percent.
    pub percentage: f64,
}

/// The question with the extremal count for one category.
#[derive(PartialEq, Debug, Clone)]
pub struct QuestionCount {
    pub question: String,
    pub count: u64,
    /// Share of the participant rows, in percent.
    pub percentage: f64,
}

/// The share of participants that picked a given category on one question.
#[derive(PartialEq, Debug, Clone)]
pub struct QuestionShare {
    pub question: String,
    pub percentage: f64,
}

/// The question with the extremal average score.
#[derive(PartialEq, Debug, Clone)]
pub struct QuestionAverage {
    pub question: String,
    pub average: f64,
}

/// One sentiment bucket with its count and share of the answered cells.
#[derive(PartialEq, Debug, Clone)]
pub struct SentimentBucket {
    pub sentiment: Sentiment,
    pub count: u64,
    pub percentage: f64,
}

/// The closed set of statistics that can be computed over a table.
///
/// This replaces a string-keyed dispatch: each variant names one
/// operation and the per-category variants carry their category.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Statistic {
    MostFrequentAnswer,
    LeastFrequentAnswer,
    TopQuestionFor(Category),
    RareCategoryBreakdown(Category),
    OverallAverageScore,
    BestQuestionAverage,
    WorstQuestionAverage,
    SentimentBreakdown,
}

/// The result of running one [Statistic] over a table.
#[derive(PartialEq, Debug, Clone)]
pub enum StatisticOutcome {
    Frequency(AnswerFrequency),
    QuestionCount(QuestionCount),
    Breakdown(Vec<QuestionShare>),
    Average(f64),
    QuestionAverage(QuestionAverage),
    Sentiment(Vec<SentimentBucket>),
}

/// Errors that prevent a statistic from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AggregationErrors {
    /// The requested statistic has no qualifying data: an extremum was
    /// requested over an empty set of counts or averages.
    EmptyAggregation,
    /// A row does not have one cell per question column.
    RaggedRow { row: usize },
}

impl Error for AggregationErrors {}

impl Display for AggregationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationErrors::EmptyAggregation => {
                write!(f, "empty aggregation: the statistic has no qualifying data")
            }
            AggregationErrors::RaggedRow { row } => {
                write!(f, "row {} does not match the number of question columns", row)
            }
        }
    }
}
