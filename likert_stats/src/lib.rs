mod model;
pub mod builder;
pub mod manual;

use log::{debug, info};

pub use crate::model::*;

// Counts per category over an iterator of cells, indexed in the order of
// Category::ALL.
fn category_counts(cells: impl Iterator<Item = Category>) -> [u64; 6] {
    let mut counts = [0u64; 6];
    for c in cells {
        counts[c as usize] += 1;
    }
    counts
}

/// The answer with the highest count over all the cells of the table.
///
/// Only categories that occur at least once participate. Ties resolve to
/// the first category in the SS, S, CS, CTS, TS, STS order.
pub fn most_frequent_answer(table: &ResponseTable) -> Result<AnswerFrequency, AggregationErrors> {
    frequency_extremum(table, true)
}

/// The answer with the lowest count over all the cells of the table.
///
/// Only categories that occur at least once participate, so a category
/// that is absent from the table is never reported as the least frequent.
pub fn least_frequent_answer(table: &ResponseTable) -> Result<AnswerFrequency, AggregationErrors> {
    frequency_extremum(table, false)
}

fn frequency_extremum(
    table: &ResponseTable,
    take_max: bool,
) -> Result<AnswerFrequency, AggregationErrors> {
    let counts = category_counts(table.cells());
    let total: u64 = counts.iter().sum();
    debug!(
        "frequency_extremum: counts: {:?} total: {:?} take_max: {:?}",
        counts, total, take_max
    );
    if total == 0 {
        return Err(AggregationErrors::EmptyAggregation);
    }
    let mut best: Option<(Category, u64)> = None;
    for cat in Category::ALL {
        let n = counts[cat as usize];
        if n == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, bn)) if take_max => n > bn,
            Some((_, bn)) => n < bn,
        };
        if better {
            best = Some((cat, n));
        }
    }
    // total > 0 guarantees at least one occurring category.
    let (category, count) = best.ok_or(AggregationErrors::EmptyAggregation)?;
    Ok(AnswerFrequency {
        category,
        count,
        percentage: 100.0 * count as f64 / total as f64,
    })
}

/// The question on which the given category was picked the most often.
///
/// The percentage is relative to the number of participant rows, not to
/// the number of answered cells. Ties resolve to the first question in
/// table order. If the category occurs nowhere in the table, the extremum
/// is undefined and this fails with
/// [AggregationErrors::EmptyAggregation].
pub fn top_question_for(
    table: &ResponseTable,
    category: Category,
) -> Result<QuestionCount, AggregationErrors> {
    let mut best: Option<(usize, u64)> = None;
    for idx in 0..table.questions().len() {
        let n = table.question_cells(idx).filter(|c| *c == category).count() as u64;
        if best.map_or(true, |(_, bn)| n > bn) {
            best = Some((idx, n));
        }
    }
    debug!(
        "top_question_for: category: {:?} best: {:?}",
        category, best
    );
    match best {
        Some((idx, n)) if n > 0 => Ok(QuestionCount {
            question: table.questions()[idx].clone(),
            count: n,
            percentage: 100.0 * n as f64 / table.num_participants() as f64,
        }),
        _ => Err(AggregationErrors::EmptyAggregation),
    }
}

/// For every question on which the given category occurs at all, the
/// share of participants that picked it, in table column order.
///
/// Questions with a zero count are omitted. The result may be empty.
pub fn rare_category_breakdown(table: &ResponseTable, category: Category) -> Vec<QuestionShare> {
    let num_participants = table.num_participants();
    let mut res: Vec<QuestionShare> = Vec::new();
    for (idx, question) in table.questions().iter().enumerate() {
        let n = table.question_cells(idx).filter(|c| *c == category).count();
        if n > 0 {
            res.push(QuestionShare {
                question: question.clone(),
                percentage: 100.0 * n as f64 / num_participants as f64,
            });
        }
    }
    res
}

/// The mean score over all the non-missing cells of the table.
pub fn overall_average_score(table: &ResponseTable) -> Result<f64, AggregationErrors> {
    let (sum, n) = table
        .cells()
        .fold((0u64, 0u64), |(sum, n), c| (sum + c.score() as u64, n + 1));
    if n == 0 {
        return Err(AggregationErrors::EmptyAggregation);
    }
    Ok(sum as f64 / n as f64)
}

/// The question with the highest mean score.
///
/// Questions without any answered cell are skipped. Ties resolve to the
/// first question in table order.
pub fn best_question_average(table: &ResponseTable) -> Result<QuestionAverage, AggregationErrors> {
    question_average_extremum(table, true)
}

/// The question with the lowest mean score. Same conventions as
/// [best_question_average].
pub fn worst_question_average(table: &ResponseTable) -> Result<QuestionAverage, AggregationErrors> {
    question_average_extremum(table, false)
}

fn question_average_extremum(
    table: &ResponseTable,
    take_max: bool,
) -> Result<QuestionAverage, AggregationErrors> {
    let mut best: Option<(usize, f64)> = None;
    for idx in 0..table.questions().len() {
        let (sum, n) = table
            .question_cells(idx)
            .fold((0u64, 0u64), |(sum, n), c| (sum + c.score() as u64, n + 1));
        if n == 0 {
            continue;
        }
        let avg = sum as f64 / n as f64;
        let better = match best {
            None => true,
            Some((_, bavg)) if take_max => avg > bavg,
            Some((_, bavg)) => avg < bavg,
        };
        if better {
            best = Some((idx, avg));
        }
    }
    debug!(
        "question_average_extremum: best: {:?} take_max: {:?}",
        best, take_max
    );
    match best {
        Some((idx, average)) => Ok(QuestionAverage {
            question: table.questions()[idx].clone(),
            average,
        }),
        None => Err(AggregationErrors::EmptyAggregation),
    }
}

/// The counts and shares of the three sentiment buckets over all the
/// non-missing cells, in Positive, Neutral, Negative order.
pub fn sentiment_breakdown(
    table: &ResponseTable,
) -> Result<Vec<SentimentBucket>, AggregationErrors> {
    let mut counts = [0u64; 3];
    let mut total = 0u64;
    for c in table.cells() {
        let bucket = match c.sentiment() {
            Sentiment::Positive => 0,
            Sentiment::Neutral => 1,
            Sentiment::Negative => 2,
        };
        counts[bucket] += 1;
        total += 1;
    }
    if total == 0 {
        return Err(AggregationErrors::EmptyAggregation);
    }
    Ok(Sentiment::ALL
        .iter()
        .zip(counts.iter())
        .map(|(sentiment, count)| SentimentBucket {
            sentiment: *sentiment,
            count: *count,
            percentage: 100.0 * *count as f64 / total as f64,
        })
        .collect())
}

/// Runs one statistic over the table.
///
/// Each invocation is a stateless pure computation: the same table and
/// statistic always yield the same outcome.
pub fn run_statistic(
    table: &ResponseTable,
    stat: &Statistic,
) -> Result<StatisticOutcome, AggregationErrors> {
    info!(
        "run_statistic: {:?} over {:?} participants and {:?} questions",
        stat,
        table.num_participants(),
        table.questions().len()
    );
    let outcome = match stat {
        Statistic::MostFrequentAnswer => StatisticOutcome::Frequency(most_frequent_answer(table)?),
        Statistic::LeastFrequentAnswer => {
            StatisticOutcome::Frequency(least_frequent_answer(table)?)
        }
        Statistic::TopQuestionFor(cat) => {
            StatisticOutcome::QuestionCount(top_question_for(table, *cat)?)
        }
        Statistic::RareCategoryBreakdown(cat) => {
            StatisticOutcome::Breakdown(rare_category_breakdown(table, *cat))
        }
        Statistic::OverallAverageScore => StatisticOutcome::Average(overall_average_score(table)?),
        Statistic::BestQuestionAverage => {
            StatisticOutcome::QuestionAverage(best_question_average(table)?)
        }
        Statistic::WorstQuestionAverage => {
            StatisticOutcome::QuestionAverage(worst_question_average(table)?)
        }
        Statistic::SentimentBreakdown => StatisticOutcome::Sentiment(sentiment_breakdown(table)?),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    // The two-question, three-participant table used as the reference
    // scenario: item_a = [SS, SS, S], item_b = [STS, TS, CS].
    fn reference_table() -> ResponseTable {
        let mut builder = Builder::new(&["item_a".to_string(), "item_b".to_string()]).unwrap();
        builder.add_row_codes(&["SS", "STS"]).unwrap();
        builder.add_row_codes(&["SS", "TS"]).unwrap();
        builder.add_row_codes(&["S", "CS"]).unwrap();
        builder.build().unwrap()
    }

    fn empty_table() -> ResponseTable {
        ResponseTable::new(vec!["item_a".to_string()], vec![]).unwrap()
    }

    #[test]
    fn most_frequent_reference() {
        let table = reference_table();
        let freq = most_frequent_answer(&table).unwrap();
        assert_eq!(freq.category, Category::Ss);
        assert_eq!(freq.count, 2);
        assert!((freq.percentage - 100.0 * 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn least_frequent_reference() {
        // The singles are S, STS, TS, CS, all with count 1. The first in
        // enumeration order wins.
        let table = reference_table();
        let freq = least_frequent_answer(&table).unwrap();
        assert_eq!(freq.category, Category::S);
        assert_eq!(freq.count, 1);
    }

    #[test]
    fn least_frequent_skips_absent_categories() {
        let mut builder = Builder::new(&["item_a".to_string()]).unwrap();
        builder.add_row_codes(&["SS"]).unwrap();
        builder.add_row_codes(&["SS"]).unwrap();
        let table = builder.build().unwrap();
        // CTS never occurs: it must not be reported with a zero count.
        let freq = least_frequent_answer(&table).unwrap();
        assert_eq!(freq.category, Category::Ss);
        assert_eq!(freq.count, 2);
    }

    #[test]
    fn most_frequent_tie_breaks_on_enumeration_order() {
        let mut builder = Builder::new(&["item_a".to_string(), "item_b".to_string()]).unwrap();
        builder.add_row_codes(&["S", "SS"]).unwrap();
        builder.add_row_codes(&["SS", "S"]).unwrap();
        let table = builder.build().unwrap();
        let freq = most_frequent_answer(&table).unwrap();
        assert_eq!(freq.category, Category::Ss);
        assert_eq!(freq.count, 2);
    }

    #[test]
    fn most_frequent_on_empty_table() {
        assert_eq!(
            most_frequent_answer(&empty_table()),
            Err(AggregationErrors::EmptyAggregation)
        );
    }

    #[test]
    fn top_question_reference() {
        let table = reference_table();
        let qc = top_question_for(&table, Category::Ss).unwrap();
        assert_eq!(qc.question, "item_a");
        assert_eq!(qc.count, 2);
        assert!((qc.percentage - 100.0 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn top_question_empty_category() {
        let table = reference_table();
        assert_eq!(
            top_question_for(&table, Category::Cts),
            Err(AggregationErrors::EmptyAggregation)
        );
    }

    #[test]
    fn top_question_percentage_counts_all_rows() {
        // A row with only missing cells still counts as a participant.
        let mut builder = Builder::new(&["item_a".to_string()]).unwrap();
        builder.add_row_codes(&["SS"]).unwrap();
        builder.add_row_codes(&["SS"]).unwrap();
        builder.add_row_codes(&[""]).unwrap();
        builder.add_row_codes(&[""]).unwrap();
        let table = builder.build().unwrap();
        let qc = top_question_for(&table, Category::Ss).unwrap();
        assert_eq!(qc.count, 2);
        assert!((qc.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rare_breakdown_omits_zero_count_questions() {
        let table = reference_table();
        let shares = rare_category_breakdown(&table, Category::Sts);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].question, "item_b");
        assert!((shares[0].percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rare_breakdown_may_be_empty() {
        let mut builder = Builder::new(&["item_a".to_string()]).unwrap();
        builder.add_row_codes(&["SS"]).unwrap();
        let table = builder.build().unwrap();
        assert!(rare_category_breakdown(&table, Category::Sts).is_empty());
    }

    #[test]
    fn overall_average_reference() {
        // Scores [6, 6, 5, 1, 2, 4], mean 4.0.
        let table = reference_table();
        let avg = overall_average_score(&table).unwrap();
        assert!((avg - 4.0).abs() < 1e-9);
    }

    #[test]
    fn overall_average_in_score_range() {
        let table = reference_table();
        let avg = overall_average_score(&table).unwrap();
        assert!((1.0..=6.0).contains(&avg));
    }

    #[test]
    fn overall_average_excludes_missing_cells() {
        let mut builder = Builder::new(&["item_a".to_string(), "item_b".to_string()]).unwrap();
        builder.add_row_codes(&["SS", ""]).unwrap();
        builder.add_row_codes(&["", "TS"]).unwrap();
        let table = builder.build().unwrap();
        let avg = overall_average_score(&table).unwrap();
        assert!((avg - 4.0).abs() < 1e-9);
    }

    #[test]
    fn best_and_worst_question_reference() {
        let table = reference_table();
        let best = best_question_average(&table).unwrap();
        assert_eq!(best.question, "item_a");
        assert!((best.average - 17.0 / 3.0).abs() < 1e-9);
        let worst = worst_question_average(&table).unwrap();
        assert_eq!(worst.question, "item_b");
        assert!((worst.average - 7.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn best_question_tie_breaks_on_table_order() {
        let mut builder = Builder::new(&["item_a".to_string(), "item_b".to_string()]).unwrap();
        builder.add_row_codes(&["S", "S"]).unwrap();
        let table = builder.build().unwrap();
        assert_eq!(best_question_average(&table).unwrap().question, "item_a");
        assert_eq!(worst_question_average(&table).unwrap().question, "item_a");
    }

    #[test]
    fn question_average_skips_unanswered_questions() {
        let mut builder = Builder::new(&["item_a".to_string(), "item_b".to_string()]).unwrap();
        builder.add_row_codes(&["TS", ""]).unwrap();
        let table = builder.build().unwrap();
        // item_b has no answers: it is neither the best nor the worst.
        assert_eq!(best_question_average(&table).unwrap().question, "item_a");
        assert_eq!(worst_question_average(&table).unwrap().question, "item_a");
    }

    #[test]
    fn sentiment_reference() {
        let table = reference_table();
        let buckets = sentiment_breakdown(&table).unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].sentiment, Sentiment::Positive);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[1].sentiment, Sentiment::Neutral);
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[2].sentiment, Sentiment::Negative);
        assert_eq!(buckets[2].count, 2);
        let total_pct: f64 = buckets.iter().map(|b| b.percentage).sum();
        assert!((total_pct - 100.0).abs() < 0.1);
    }

    #[test]
    fn single_cell_table_has_valid_statistics() {
        let mut builder = Builder::new(&["item_a".to_string()]).unwrap();
        builder.add_row_codes(&["CS"]).unwrap();
        let table = builder.build().unwrap();

        let stats = [
            Statistic::MostFrequentAnswer,
            Statistic::LeastFrequentAnswer,
            Statistic::TopQuestionFor(Category::Cs),
            Statistic::RareCategoryBreakdown(Category::Sts),
            Statistic::OverallAverageScore,
            Statistic::BestQuestionAverage,
            Statistic::WorstQuestionAverage,
            Statistic::SentimentBreakdown,
        ];
        for stat in stats {
            let outcome = run_statistic(&table, &stat).unwrap();
            if let StatisticOutcome::Average(avg) = outcome {
                assert!((avg - 4.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn run_statistic_matches_direct_call() {
        let table = reference_table();
        assert_eq!(
            run_statistic(&table, &Statistic::MostFrequentAnswer).unwrap(),
            StatisticOutcome::Frequency(most_frequent_answer(&table).unwrap())
        );
        assert_eq!(
            run_statistic(&table, &Statistic::SentimentBreakdown).unwrap(),
            StatisticOutcome::Sentiment(sentiment_breakdown(&table).unwrap())
        );
    }

    #[test]
    fn run_statistic_is_deterministic() {
        let table = reference_table();
        let first = run_statistic(&table, &Statistic::SentimentBreakdown).unwrap();
        let second = run_statistic(&table, &Statistic::SentimentBreakdown).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ragged_row_is_rejected() {
        let res = ResponseTable::new(
            vec!["item_a".to_string(), "item_b".to_string()],
            vec![vec![Some(Category::Ss)]],
        );
        assert_eq!(res, Err(AggregationErrors::RaggedRow { row: 0 }));
    }
}
