//! Survey response aggregation.
//!
//! Turns a snapshot of questions and responses into per-question
//! distributions, a pooled satisfaction score and data-quality counts.
//! Every function here is pure: inputs are never mutated and repeated calls
//! with the same inputs return the same result.

use crate::models::{
    GlobalSummary, Predicate, QuestionStat, QuestionTier, RatingCounts, Response, Suggestion,
    SurveyAnalysis,
};
use tracing::debug;

/// Compute statistics for every question in the current list.
///
/// Entry `i` of the result describes question `i`. Only answers keyed by a
/// current question index are considered; unrecognized codes are skipped.
pub fn compute_per_question_stats(questions: &[String], responses: &[Response]) -> Vec<QuestionStat> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let mut counts = RatingCounts::default();

            for code in responses
                .iter()
                .filter_map(|r| r.answer(index))
                .filter_map(|rating| rating.code())
            {
                counts.record(code);
            }

            let total = counts.total();
            let mean = counts.mean();

            QuestionStat {
                index,
                question: question.clone(),
                counts,
                total,
                mean,
                tier: (total > 0).then(|| QuestionTier::from_mean(mean)),
            }
        })
        .collect()
}

/// Compute the pooled summary over every answer of every response.
///
/// Unlike [`compute_per_question_stats`] this does not look at the question
/// list at all: answers keyed by removed or out-of-range indices still count.
pub fn compute_global_summary(responses: &[Response]) -> GlobalSummary {
    let mut total_weight: u64 = 0;
    let mut total_answers: usize = 0;

    for code in responses
        .iter()
        .flat_map(|r| r.answers.values())
        .filter_map(|rating| rating.code())
    {
        total_weight += code.weight();
        total_answers += 1;
    }

    let pooled_mean = if total_answers == 0 {
        0.0
    } else {
        total_weight as f64 / total_answers as f64
    };

    GlobalSummary {
        response_count: responses.len(),
        answer_count: total_answers,
        pooled_mean,
        predicate: Predicate::from_pooled(pooled_mean, total_answers),
    }
}

/// Count recognized answers whose key does not name a current question.
pub fn count_stale_answers(question_count: usize, responses: &[Response]) -> usize {
    responses
        .iter()
        .flat_map(|r| r.answers.iter())
        .filter(|(_, rating)| rating.code().is_some())
        .filter(|(key, _)| !is_current_index(key, question_count))
        .count()
}

/// Count answers whose value is not one of the four codes.
pub fn count_unrecognized_answers(responses: &[Response]) -> usize {
    responses
        .iter()
        .flat_map(|r| r.answers.values())
        .filter(|rating| rating.code().is_none())
        .count()
}

/// Question index an answer key names. A key names index `i` only when it is
/// exactly `i.to_string()`, so `"01"` and `"+1"` name nothing.
pub fn question_index(key: &str) -> Option<usize> {
    key.parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == key)
}

fn is_current_index(key: &str, question_count: usize) -> bool {
    question_index(key).is_some_and(|index| index < question_count)
}

/// Collect non-empty suggestions in submission order.
pub fn collect_suggestions(responses: &[Response]) -> Vec<Suggestion> {
    responses
        .iter()
        .filter(|r| !r.suggestions.trim().is_empty())
        .map(|r| Suggestion {
            name: r.name.clone(),
            submitted_at: r.submitted_at.clone(),
            text: r.suggestions.trim().to_string(),
        })
        .collect()
}

/// Get the `n` answered questions with the lowest mean, worst first.
///
/// Ties keep question order.
pub fn weakest_questions(stats: &[QuestionStat], n: usize) -> Vec<&QuestionStat> {
    let mut answered: Vec<&QuestionStat> = stats.iter().filter(|s| s.has_data()).collect();

    answered.sort_by(|a, b| {
        a.mean
            .partial_cmp(&b.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });
    answered.truncate(n);

    answered
}

/// Run the full analysis over one snapshot.
pub fn analyze(questions: &[String], responses: &[Response]) -> SurveyAnalysis {
    let stats = compute_per_question_stats(questions, responses);
    let summary = compute_global_summary(responses);
    let stale_answers = count_stale_answers(questions.len(), responses);
    let unrecognized_answers = count_unrecognized_answers(responses);

    let timestamps: Vec<_> = responses
        .iter()
        .filter_map(Response::submitted_at_utc)
        .collect();

    debug!(
        "Analyzed {} responses over {} questions ({} pooled answers, {} stale, {} unrecognized)",
        summary.response_count,
        questions.len(),
        summary.answer_count,
        stale_answers,
        unrecognized_answers
    );

    SurveyAnalysis {
        questions: stats,
        summary,
        stale_answers,
        unrecognized_answers,
        suggestions: collect_suggestions(responses),
        first_submission: timestamps.iter().min().copied(),
        last_submission: timestamps.iter().max().copied(),
    }
}
