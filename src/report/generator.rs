//! Report generation.
//!
//! This module renders a [`SurveyReport`] as Markdown for people or as JSON
//! for other tools.

use crate::analysis::weakest_questions;
use crate::models::{
    GlobalSummary, QuestionStat, QuestionTier, RatingCode, ReportMetadata, Suggestion,
    SurveyAnalysis, SurveyReport,
};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Rendering options for the Markdown report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub include_suggestions: bool,
    pub max_suggestions: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_suggestions: true,
            max_suggestions: 50,
        }
    }
}

/// Assemble a report from an analysis.
pub fn build_report(
    analysis: SurveyAnalysis,
    title: &str,
    source: &str,
    weakest: usize,
) -> SurveyReport {
    let weakest_questions = weakest_questions(&analysis.questions, weakest)
        .into_iter()
        .map(|s| s.index)
        .collect();

    SurveyReport {
        metadata: ReportMetadata {
            title: title.to_string(),
            source: source.to_string(),
            generated_at: Utc::now(),
            question_count: analysis.questions.len(),
            response_count: analysis.summary.response_count,
        },
        analysis,
        weakest_questions,
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &SurveyReport, options: &ReportOptions) -> String {
    let analysis = &report.analysis;
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.title));
    output.push_str(&generate_metadata_section(&report.metadata, analysis));
    output.push_str(&generate_summary_section(&analysis.summary));
    output.push_str(&generate_questions_section(&analysis.questions));
    output.push_str(&generate_weakest_section(report));
    output.push_str(&generate_data_quality_section(analysis));

    if options.include_suggestions {
        output.push_str(&generate_suggestions_section(
            &analysis.suggestions,
            options.max_suggestions,
        ));
    }

    output.push_str(&generate_footer());

    output
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, analysis: &SurveyAnalysis) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Questions:** {}\n", metadata.question_count));
    section.push_str(&format!("- **Responses:** {}\n", metadata.response_count));

    if let (Some(first), Some(last)) = (&analysis.first_submission, &analysis.last_submission) {
        section.push_str(&format!(
            "- **Submission Window:** {} to {}\n",
            format_timestamp(first),
            format_timestamp(last)
        ));
    }
    section.push('\n');

    section
}

/// Generate the overall summary section.
fn generate_summary_section(summary: &GlobalSummary) -> String {
    let mut section = String::new();

    section.push_str("## Overall Satisfaction\n\n");
    section.push_str("| Responses | Answers | Mean (1-4) | Result |\n");
    section.push_str("|:---:|:---:|:---:|:---|\n");
    section.push_str(&format!(
        "| {} | {} | {:.2} | {} **{}** |\n\n",
        summary.response_count,
        summary.answer_count,
        summary.pooled_mean,
        summary.predicate.emoji(),
        summary.predicate
    ));

    section
}

/// Generate the per-question table.
fn generate_questions_section(stats: &[QuestionStat]) -> String {
    let mut section = String::new();

    section.push_str("## Results per Question\n\n");

    if stats.is_empty() {
        section.push_str("No survey questions are configured.\n\n");
        return section;
    }

    section.push_str("| # | Question |");
    for code in RatingCode::ALL {
        section.push_str(&format!(" {} |", code));
    }
    section.push_str(" Answered | Mean | Tier |\n");
    section.push_str("|:---:|:---|:---:|:---:|:---:|:---:|:---:|:---:|:---|\n");

    for stat in stats {
        section.push_str(&generate_question_row(stat));
    }
    section.push('\n');

    section.push_str("*Legend: ");
    let legend: Vec<String> = RatingCode::ALL
        .iter()
        .map(|c| format!("{} = {} ({})", c, c.label(), c.weight()))
        .collect();
    section.push_str(&legend.join(", "));
    section.push_str("*\n\n");
    section.push_str(&generate_tier_legend());

    section
}

/// One line naming each tier, its console color and the mean it starts at.
fn generate_tier_legend() -> String {
    let mut previous_bound = None;
    let tiers: Vec<String> = QuestionTier::ALL
        .iter()
        .map(|tier| {
            let range = match previous_bound {
                Some(bound) if tier.lower_bound().is_infinite() => format!("< {:.2}", bound),
                _ => format!("≥ {:.2}", tier.lower_bound()),
            };
            previous_bound = Some(tier.lower_bound());
            format!("{} {} ({}) {}", tier.emoji(), tier, tier.color(), range)
        })
        .collect();
    format!("*Tiers: {}*\n\n", tiers.join(", "))
}

/// Generate a single table row.
fn generate_question_row(stat: &QuestionStat) -> String {
    let mut row = format!("| {} | {} |", stat.index + 1, escape_cell(&stat.question));

    for code in RatingCode::ALL {
        row.push_str(&format!(" {} |", stat.counts.get(code)));
    }

    match stat.tier {
        Some(tier) => row.push_str(&format!(
            " {} | {:.2} | {} {} |\n",
            stat.total,
            stat.mean,
            tier.emoji(),
            tier
        )),
        None => row.push_str(" 0 | - | No data |\n"),
    }

    row
}

/// Generate the weakest questions section.
fn generate_weakest_section(report: &SurveyReport) -> String {
    if report.weakest_questions.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Needs Attention\n\n");

    for (rank, index) in report.weakest_questions.iter().enumerate() {
        if let Some(stat) = report.analysis.questions.get(*index) {
            section.push_str(&format!(
                "{}. **Q{}** {} (mean {:.2}, {} answers)\n",
                rank + 1,
                stat.index + 1,
                stat.question,
                stat.mean,
                stat.total
            ));
        }
    }
    section.push('\n');

    section
}

/// Generate the data quality notes, if any.
fn generate_data_quality_section(analysis: &SurveyAnalysis) -> String {
    if analysis.stale_answers == 0 && analysis.unrecognized_answers == 0 {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Data Quality\n\n");

    if analysis.stale_answers > 0 {
        section.push_str(&format!(
            "- {} answer(s) refer to question numbers that no longer exist. \
             They count toward the overall mean but not toward any question.\n",
            analysis.stale_answers
        ));
    }
    if analysis.unrecognized_answers > 0 {
        section.push_str(&format!(
            "- {} answer(s) have an unrecognized rating and were ignored.\n",
            analysis.unrecognized_answers
        ));
    }
    section.push('\n');

    section
}

/// Generate the suggestions section.
fn generate_suggestions_section(suggestions: &[Suggestion], max: usize) -> String {
    let mut section = String::new();

    section.push_str("## Suggestions\n\n");

    if suggestions.is_empty() {
        section.push_str("No suggestions were submitted.\n\n");
        return section;
    }

    for suggestion in suggestions.iter().take(max) {
        let who = if suggestion.name.trim().is_empty() {
            "Anonymous"
        } else {
            suggestion.name.trim()
        };
        section.push_str(&format!("> {}\n>\n> *{}", suggestion.text, who));
        if !suggestion.submitted_at.is_empty() {
            section.push_str(&format!(", {}", suggestion.submitted_at));
        }
        section.push_str("*\n\n");
    }

    if suggestions.len() > max {
        section.push_str(&format!(
            "*{} more suggestion(s) omitted.*\n\n",
            suggestions.len() - max
        ));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by surveytally*\n".to_string()
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SurveyReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
