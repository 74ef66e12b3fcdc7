//! Data models for survey responses and their derived statistics.
//!
//! This module contains the stored shapes (document, settings, responses,
//! rating codes) and the derived shapes produced by the aggregator
//! (per-question statistics, the global summary and the report).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// One of the four Likert codes, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingCode {
    /// "Kurang" (poor), weight 1.
    #[serde(rename = "K")]
    Kurang,
    /// "Cukup" (fair), weight 2.
    #[serde(rename = "C")]
    Cukup,
    /// "Baik" (good), weight 3.
    #[serde(rename = "B")]
    Baik,
    /// "Baik Sekali" (excellent), weight 4.
    #[serde(rename = "BS")]
    BaikSekali,
}

impl RatingCode {
    /// All codes, worst first.
    pub const ALL: [RatingCode; 4] = [
        RatingCode::Kurang,
        RatingCode::Cukup,
        RatingCode::Baik,
        RatingCode::BaikSekali,
    ];

    /// Parses a stored code. Matching is exact: `"bs"` or `" B"` are not codes.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "K" => Some(RatingCode::Kurang),
            "C" => Some(RatingCode::Cukup),
            "B" => Some(RatingCode::Baik),
            "BS" => Some(RatingCode::BaikSekali),
            _ => None,
        }
    }

    /// The code as it appears in stored answer maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingCode::Kurang => "K",
            RatingCode::Cukup => "C",
            RatingCode::Baik => "B",
            RatingCode::BaikSekali => "BS",
        }
    }

    /// Weight on the 1-4 scale.
    pub fn weight(&self) -> u64 {
        match self {
            RatingCode::Kurang => 1,
            RatingCode::Cukup => 2,
            RatingCode::Baik => 3,
            RatingCode::BaikSekali => 4,
        }
    }

    /// Human-readable label shown to respondents.
    pub fn label(&self) -> &'static str {
        match self {
            RatingCode::Kurang => "Kurang",
            RatingCode::Cukup => "Cukup",
            RatingCode::Baik => "Baik",
            RatingCode::BaikSekali => "Baik Sekali",
        }
    }
}

impl fmt::Display for RatingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A value found in an answer map.
///
/// Anything that is not exactly one of the four code strings is kept as
/// `Unrecognized` with its raw JSON value, so it is written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Rating {
    Recognized(RatingCode),
    Unrecognized(Value),
}

impl Rating {
    /// Returns the code if this rating is one of the four recognized ones.
    pub fn code(&self) -> Option<RatingCode> {
        match self {
            Rating::Recognized(code) => Some(*code),
            Rating::Unrecognized(_) => None,
        }
    }
}

impl From<Value> for Rating {
    fn from(value: Value) -> Self {
        match value.as_str().and_then(RatingCode::parse) {
            Some(code) => Rating::Recognized(code),
            None => Rating::Unrecognized(value),
        }
    }
}

impl From<Rating> for Value {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Recognized(code) => Value::String(code.as_str().to_string()),
            Rating::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for Rating {
    fn from(raw: &str) -> Self {
        Rating::from(Value::String(raw.to_string()))
    }
}

/// Answer map of a single submission, keyed by question index at submission time.
pub type Answers = BTreeMap<String, Rating>;

/// One survey submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Opaque unique identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Respondent name (free text).
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Submission timestamp as stored (ISO 8601).
    #[serde(default, deserialize_with = "null_as_default")]
    pub submitted_at: String,
    /// Question index → rating.
    #[serde(
        rename = "responses",
        default,
        deserialize_with = "deserialize_answers"
    )]
    pub answers: Answers,
    /// Free-text suggestion or comment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: String,
}

impl Response {
    /// Creates a fresh submission stamped with a new id and the current time.
    pub fn new(name: impl Into<String>, answers: Answers, suggestions: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            submitted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            answers,
            suggestions: suggestions.into(),
        }
    }

    /// Looks up the answer for a question index.
    pub fn answer(&self, index: usize) -> Option<&Rating> {
        self.answers.get(&index.to_string())
    }

    /// Parses the stored timestamp, if it is valid RFC 3339.
    pub fn submitted_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.submitted_at.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Reads `null` as the type's default; `#[serde(default)]` alone only covers
/// a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts an object (the normal shape), an array (sequential keys written as
/// a list), and degrades anything else to an empty map.
fn deserialize_answers<'de, D>(deserializer: D) -> Result<Answers, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let answers = match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, raw)| (key, Rating::from(raw)))
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, raw)| !raw.is_null())
            .map(|(index, raw)| (index.to_string(), Rating::from(raw)))
            .collect(),
        _ => Answers::new(),
    };

    Ok(answers)
}

/// The survey part of the settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveySettings {
    /// Ordered question texts; position is identity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<String>,
    /// Settings owned by other parts of the console.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The stored content document, read and written wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyDocument {
    #[serde(rename = "surveySettings", default, deserialize_with = "null_as_default")]
    pub settings: SurveySettings,
    #[serde(rename = "surveyResponses", default, deserialize_with = "null_as_default")]
    pub responses: Vec<Response>,
    /// Unrelated console content, preserved across saves.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Counts of each recognized code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
    #[serde(rename = "K")]
    pub kurang: usize,
    #[serde(rename = "C")]
    pub cukup: usize,
    #[serde(rename = "B")]
    pub baik: usize,
    #[serde(rename = "BS")]
    pub baik_sekali: usize,
}

impl RatingCounts {
    pub fn record(&mut self, code: RatingCode) {
        match code {
            RatingCode::Kurang => self.kurang += 1,
            RatingCode::Cukup => self.cukup += 1,
            RatingCode::Baik => self.baik += 1,
            RatingCode::BaikSekali => self.baik_sekali += 1,
        }
    }

    pub fn get(&self, code: RatingCode) -> usize {
        match code {
            RatingCode::Kurang => self.kurang,
            RatingCode::Cukup => self.cukup,
            RatingCode::Baik => self.baik,
            RatingCode::BaikSekali => self.baik_sekali,
        }
    }

    pub fn total(&self) -> usize {
        self.kurang + self.cukup + self.baik + self.baik_sekali
    }

    /// Sum of weight × count.
    pub fn weighted_sum(&self) -> u64 {
        RatingCode::ALL
            .iter()
            .map(|code| code.weight() * self.get(*code) as u64)
            .sum()
    }

    /// Weighted mean on the 1.0-4.0 scale, or 0.0 when nothing was counted.
    pub fn mean(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.weighted_sum() as f64 / total as f64,
        }
    }
}

/// Classification of a single question's mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuestionTier {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QuestionTier {
    /// All tiers, best first.
    pub const ALL: [QuestionTier; 4] = [
        QuestionTier::Excellent,
        QuestionTier::Good,
        QuestionTier::Fair,
        QuestionTier::Poor,
    ];

    /// Smallest mean that reaches this tier. Poor takes everything below Fair.
    pub fn lower_bound(&self) -> f64 {
        match self {
            QuestionTier::Excellent => 3.5,
            QuestionTier::Good => 3.0,
            QuestionTier::Fair => 2.5,
            QuestionTier::Poor => f64::NEG_INFINITY,
        }
    }

    /// Tier for a mean. Lower bounds are inclusive.
    pub fn from_mean(mean: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|tier| mean >= tier.lower_bound())
            .unwrap_or(QuestionTier::Poor)
    }

    /// Display color used by the console's analytics table.
    pub fn color(&self) -> &'static str {
        match self {
            QuestionTier::Excellent => "green",
            QuestionTier::Good => "blue",
            QuestionTier::Fair => "yellow",
            QuestionTier::Poor => "red",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            QuestionTier::Excellent => "🟢",
            QuestionTier::Good => "🔵",
            QuestionTier::Fair => "🟡",
            QuestionTier::Poor => "🔴",
        }
    }
}

impl fmt::Display for QuestionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionTier::Excellent => write!(f, "Excellent"),
            QuestionTier::Good => write!(f, "Good"),
            QuestionTier::Fair => write!(f, "Fair"),
            QuestionTier::Poor => write!(f, "Poor"),
        }
    }
}

/// Statistics for one question index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStat {
    /// Position in the current question list.
    pub index: usize,
    /// Question text at analysis time.
    pub question: String,
    pub counts: RatingCounts,
    /// Number of recognized answers.
    pub total: usize,
    /// Unrounded weighted mean; 0.0 means no data.
    pub mean: f64,
    /// `None` when no recognized answers exist.
    pub tier: Option<QuestionTier>,
}

impl QuestionStat {
    pub fn has_data(&self) -> bool {
        self.total > 0
    }
}

/// Overall quality label for the pooled mean.
///
/// Variants are ordered so that a better result compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Predicate {
    #[serde(rename = "No data yet")]
    NoData,
    #[serde(rename = "Poor")]
    Poor,
    #[serde(rename = "Fair")]
    Fair,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
}

impl Predicate {
    /// Predicate for a pooled mean over `answers` recognized answers.
    pub fn from_pooled(mean: f64, answers: usize) -> Self {
        if answers == 0 {
            Predicate::NoData
        } else if mean >= 3.5 {
            Predicate::VeryGood
        } else if mean >= 3.0 {
            Predicate::Good
        } else if mean >= 2.5 {
            Predicate::Fair
        } else {
            Predicate::Poor
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Predicate::VeryGood => "🟢",
            Predicate::Good => "🔵",
            Predicate::Fair => "🟡",
            Predicate::Poor => "🔴",
            Predicate::NoData => "⚪",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::NoData => write!(f, "No data yet"),
            Predicate::Poor => write!(f, "Poor"),
            Predicate::Fair => write!(f, "Fair"),
            Predicate::Good => write!(f, "Good"),
            Predicate::VeryGood => write!(f, "Very Good"),
        }
    }
}

/// Pooled statistics across every answer of every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub response_count: usize,
    /// Recognized answers that went into the pooled mean.
    pub answer_count: usize,
    pub pooled_mean: f64,
    pub predicate: Predicate,
}

/// A non-empty free-text comment left by a respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub submitted_at: String,
    pub text: String,
}

/// Everything computed from one snapshot of questions and responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnalysis {
    pub questions: Vec<QuestionStat>,
    pub summary: GlobalSummary,
    /// Recognized answers keyed outside the current question list.
    pub stale_answers: usize,
    /// Answers whose value is not one of the four codes.
    pub unrecognized_answers: usize,
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_submission: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_submission: Option<DateTime<Utc>>,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub title: String,
    /// Where the document was loaded from.
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub question_count: usize,
    pub response_count: usize,
}

/// The complete survey report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyReport {
    pub metadata: ReportMetadata,
    pub analysis: SurveyAnalysis,
    /// Indices of the lowest-scoring answered questions, worst first.
    pub weakest_questions: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_code_ordering() {
        assert!(RatingCode::Kurang < RatingCode::Cukup);
        assert!(RatingCode::Cukup < RatingCode::Baik);
        assert!(RatingCode::Baik < RatingCode::BaikSekali);
    }

    #[test]
    fn test_rating_code_parse_is_exact() {
        assert_eq!(RatingCode::parse("BS"), Some(RatingCode::BaikSekali));
        assert_eq!(RatingCode::parse("K"), Some(RatingCode::Kurang));
        assert_eq!(RatingCode::parse("bs"), None);
        assert_eq!(RatingCode::parse(" B"), None);
        assert_eq!(RatingCode::parse("X"), None);
    }

    #[test]
    fn test_rating_from_value() {
        assert_eq!(
            Rating::from(json!("C")),
            Rating::Recognized(RatingCode::Cukup)
        );
        assert_eq!(Rating::from(json!(3)), Rating::Unrecognized(json!(3)));
        assert_eq!(Rating::from("X").code(), None);
    }

    #[test]
    fn test_response_lenient_answers() {
        let raw = json!([
            { "id": "1", "name": "a", "submittedAt": "", "responses": null, "suggestions": "" },
            { "id": "2", "responses": "garbage" },
            { "id": "3", "responses": ["BS", null, "K"] },
            { "id": "4" }
        ]);

        let responses: Vec<Response> = serde_json::from_value(raw).unwrap();
        assert!(responses[0].answers.is_empty());
        assert!(responses[1].answers.is_empty());
        assert_eq!(responses[2].answers.len(), 2);
        assert_eq!(
            responses[2].answer(2),
            Some(&Rating::Recognized(RatingCode::Kurang))
        );
        assert_eq!(responses[2].answer(1), None);
        assert!(responses[3].answers.is_empty());
        assert_eq!(responses[3].name, "");
    }

    #[test]
    fn test_unrecognized_values_round_trip() {
        let raw = json!({ "id": "1", "responses": { "0": 4, "1": "B", "2": { "x": 1 } } });
        let response: Response = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&response).unwrap();

        assert_eq!(back["responses"]["0"], json!(4));
        assert_eq!(back["responses"]["1"], json!("B"));
        assert_eq!(back["responses"]["2"], json!({ "x": 1 }));
        assert_eq!(back["submittedAt"], json!(""));
    }

    #[test]
    fn test_response_new() {
        let mut answers = Answers::new();
        answers.insert("0".to_string(), Rating::from("BS"));
        let response = Response::new("Budi", answers, "");

        assert!(Uuid::parse_str(&response.id).is_ok());
        assert!(response.submitted_at_utc().is_some());
        assert_eq!(response.name, "Budi");
    }

    #[test]
    fn test_document_preserves_unknown_keys() {
        let raw = json!({
            "hero": { "title": "Welcome" },
            "surveySettings": { "questions": ["Q1"], "intro": "Hello" },
            "surveyResponses": []
        });

        let doc: SurveyDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.settings.questions, vec!["Q1"]);
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_rating_counts_mean() {
        let mut counts = RatingCounts::default();
        assert_eq!(counts.mean(), 0.0);

        for code in RatingCode::ALL {
            counts.record(code);
        }
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.weighted_sum(), 10);
        assert_eq!(counts.mean(), 2.5);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(QuestionTier::from_mean(4.0), QuestionTier::Excellent);
        assert_eq!(QuestionTier::from_mean(3.5), QuestionTier::Excellent);
        assert_eq!(QuestionTier::from_mean(3.49), QuestionTier::Good);
        assert_eq!(QuestionTier::from_mean(3.0), QuestionTier::Good);
        assert_eq!(QuestionTier::from_mean(2.99), QuestionTier::Fair);
        assert_eq!(QuestionTier::from_mean(2.5), QuestionTier::Fair);
        assert_eq!(QuestionTier::from_mean(2.49), QuestionTier::Poor);
        assert_eq!(QuestionTier::from_mean(1.0), QuestionTier::Poor);
    }

    #[test]
    fn test_predicate_boundaries() {
        assert_eq!(Predicate::from_pooled(0.0, 0), Predicate::NoData);
        assert_eq!(Predicate::from_pooled(3.5, 1), Predicate::VeryGood);
        assert_eq!(Predicate::from_pooled(3.0, 1), Predicate::Good);
        assert_eq!(Predicate::from_pooled(2.5, 1), Predicate::Fair);
        assert_eq!(Predicate::from_pooled(1.0, 1), Predicate::Poor);
        assert!(Predicate::NoData < Predicate::Poor);
        assert!(Predicate::Good < Predicate::VeryGood);
    }

    #[test]
    fn test_predicate_serializes_as_label() {
        assert_eq!(
            serde_json::to_value(Predicate::NoData).unwrap(),
            json!("No data yet")
        );
        assert_eq!(
            serde_json::to_value(Predicate::VeryGood).unwrap(),
            json!("Very Good")
        );
    }
}
